//! Eager batch conversion entry points.
//!
//! [`run_batch`] converts every discovered workbook and returns once the
//! whole batch is done. It drains [`crate::stream::batch_stream`], so both
//! entry points share the same per-file logic in [`convert_workbook`].
//!
//! Failures are contained at the smallest unit that can absorb them: a bad
//! sheet is recorded and its siblings still render, a bad workbook is
//! recorded and the next file is processed. Only problems that prevent the
//! run from starting surface as `Err(BatchError)`.

use crate::config::{BatchConfig, SheetLayout};
use crate::error::{BatchError, FileError, RenderError, SheetError};
use crate::output::{BatchSummary, FileOutcome, FileReport, SheetOutcome, SheetReport};
use crate::pipeline::discover::{base_name, DiscoveredFile};
use crate::pipeline::pdf::{PdfRenderer, WeasyPrintRenderer};
use crate::pipeline::read::SheetTable;
use crate::pipeline::{html, naming, read};
use crate::stream::batch_stream;
use crate::stylesheet::build_stylesheet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// One unit of batch work: an input workbook and the directory its PDFs go to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub input: PathBuf,
    pub output_dir: PathBuf,
}

impl ConversionJob {
    pub fn new(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Job for a discovered file, applying the config's mirroring rule.
    pub fn for_discovered(file: &DiscoveredFile, config: &BatchConfig) -> Self {
        let output_dir = naming::output_dir_for(
            &config.output_dir,
            &file.relative_dir,
            config.mirrors_output(),
        );
        Self::new(file.path.clone(), output_dir)
    }

    /// Input file name without extension.
    pub fn base_name(&self) -> String {
        base_name(&self.input)
    }
}

/// Convert every spreadsheet under `config.input_dir`.
///
/// # Returns
/// `Ok(BatchSummary)` once every discovered file has been attempted, even if
/// some failed (check `summary.stats.files_failed`).
///
/// # Errors
/// Returns `Err(BatchError)` only when the run cannot start:
/// - the input directory does not exist (nothing is created or written)
/// - the output root cannot be created
pub fn run_batch(config: &BatchConfig) -> Result<BatchSummary, BatchError> {
    Ok(batch_stream(config)?.finish())
}

/// Pick the renderer for a run.
///
/// 1. A pre-built renderer on the config wins.
/// 2. Then an explicit WeasyPrint path.
/// 3. Otherwise WeasyPrint is located via `WEASYPRINT_PATH` / `PATH`.
pub fn resolve_renderer(config: &BatchConfig) -> Result<Arc<dyn PdfRenderer>, RenderError> {
    if let Some(ref renderer) = config.renderer {
        return Ok(Arc::clone(renderer));
    }
    if let Some(ref path) = config.weasyprint_path {
        return Ok(Arc::new(WeasyPrintRenderer::new(path)));
    }
    let renderer = WeasyPrintRenderer::locate()?;
    debug!("Using WeasyPrint at {}", renderer.executable().display());
    Ok(Arc::new(renderer))
}

/// Convert one workbook according to `config.layout`.
///
/// Never fails as a whole: problems are recorded in the returned report.
/// Sheets are read in full before anything renders, so a workbook with an
/// unreadable sheet produces no PDFs at all.
pub fn convert_workbook(
    job: &ConversionJob,
    config: &BatchConfig,
    renderer: &dyn PdfRenderer,
) -> FileReport {
    let started = Instant::now();
    let report = FileReport::new(job.input.clone(), job.output_dir.clone());
    info!("Processing: {}", job.input.display());

    // ── Step 1: Read every sheet ─────────────────────────────────────────
    let tables = match read_all_sheets(&job.input) {
        Ok(tables) => tables,
        Err(e) => {
            error!("  Error processing {}: {}", job.input.display(), e);
            return report.failed(e);
        }
    };

    if tables.is_empty() {
        warn!("  No sheets found in {}", job.input.display());
        let mut report = report;
        report.outcome = FileOutcome::NoSheets;
        return report;
    }

    // ── Step 2: Render ───────────────────────────────────────────────────
    let css = build_stylesheet(&config.page_setup, config.extra_css.as_deref());
    let mut report = match config.layout {
        SheetLayout::PerSheet => render_per_sheet(job, config, renderer, &tables, &css, report),
        SheetLayout::Combined => render_combined(job, config, renderer, &tables, &css, report),
    };

    if matches!(report.outcome, FileOutcome::Converted)
        && report
            .sheets
            .iter()
            .all(|s| s.outcome == SheetOutcome::SkippedEmpty)
    {
        info!("  All sheets in {} are empty; nothing written", job.input.display());
        report.outcome = FileOutcome::AllSheetsEmpty;
    } else if matches!(report.outcome, FileOutcome::Converted)
        && report.outputs.is_empty()
        && report.sheet_errors().next().is_some()
    {
        error!("  No sheet of {} could be rendered", job.input.display());
        report.outcome = FileOutcome::AllSheetsFailed;
    }

    debug!(
        "Finished {} in {}ms ({} PDF(s))",
        job.input.display(),
        started.elapsed().as_millis(),
        report.outputs.len()
    );
    report
}

fn read_all_sheets(path: &Path) -> Result<Vec<SheetTable>, FileError> {
    let mut workbook = read::open_workbook(path)?;
    let names = workbook.sheet_names();
    let mut tables = Vec::with_capacity(names.len());
    for name in &names {
        tables.push(workbook.read_sheet(name)?);
    }
    Ok(tables)
}

fn ensure_output_dir(dir: &Path) -> Result<(), FileError> {
    fs::create_dir_all(dir).map_err(|e| FileError::OutputDirCreateFailed {
        path: dir.to_path_buf(),
        detail: e.to_string(),
    })
}

fn skipped(job: &ConversionJob, config: &BatchConfig, table: &SheetTable) -> SheetReport {
    info!("  Skipping empty sheet: '{}'", table.name);
    if let Some(ref cb) = config.progress_callback {
        cb.on_sheet_skipped(&job.input, &table.name);
    }
    SheetReport {
        sheet: table.name.clone(),
        rows: 0,
        outcome: SheetOutcome::SkippedEmpty,
    }
}

fn render_per_sheet(
    job: &ConversionJob,
    config: &BatchConfig,
    renderer: &dyn PdfRenderer,
    tables: &[SheetTable],
    css: &str,
    mut report: FileReport,
) -> FileReport {
    let names: Vec<String> = tables.iter().map(|t| t.name.clone()).collect();
    let paths = naming::sheet_output_paths(&job.output_dir, &job.base_name(), &names);

    for (table, path) in tables.iter().zip(paths) {
        if table.is_empty() {
            report.sheets.push(skipped(job, config, table));
            continue;
        }

        if let Err(e) = ensure_output_dir(&job.output_dir) {
            error!("  Error processing {}: {}", job.input.display(), e);
            return report.failed(e);
        }

        let document = html::sheet_document(table);
        match renderer.render(&document, css, &path) {
            Ok(()) => {
                info!("  Saved sheet '{}' to: {}", table.name, path.display());
                if let Some(ref cb) = config.progress_callback {
                    cb.on_sheet_written(&job.input, &table.name, &path);
                }
                report.outputs.push(path.clone());
                report.sheets.push(SheetReport {
                    sheet: table.name.clone(),
                    rows: table.row_count(),
                    outcome: SheetOutcome::Written { output: path },
                });
            }
            Err(e) if e.is_systemic() => {
                error!("  {} renderer unavailable: {}", renderer.name(), e);
                return report.failed(FileError::RendererUnavailable {
                    detail: e.to_string(),
                });
            }
            Err(e) => {
                let err = SheetError::RenderFailed {
                    sheet: table.name.clone(),
                    detail: e.to_string(),
                };
                error!("  {}", err);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_sheet_error(&job.input, &table.name, &err.to_string());
                }
                report.sheets.push(SheetReport {
                    sheet: table.name.clone(),
                    rows: table.row_count(),
                    outcome: SheetOutcome::Failed(err),
                });
            }
        }
    }

    report
}

fn render_combined(
    job: &ConversionJob,
    config: &BatchConfig,
    renderer: &dyn PdfRenderer,
    tables: &[SheetTable],
    css: &str,
    mut report: FileReport,
) -> FileReport {
    let non_empty: Vec<&SheetTable> = tables.iter().filter(|t| !t.is_empty()).collect();

    if non_empty.is_empty() {
        for table in tables {
            report.sheets.push(skipped(job, config, table));
        }
        return report;
    }

    if let Err(e) = ensure_output_dir(&job.output_dir) {
        error!("  Error processing {}: {}", job.input.display(), e);
        return report.failed(e);
    }

    let base = job.base_name();
    let path = naming::workbook_output_path(&job.output_dir, &base);
    let document = html::combined_document(&base, non_empty.iter().copied());

    let render_error = match renderer.render(&document, css, &path) {
        Ok(()) => {
            info!(
                "  Saved {} sheet(s) to: {}",
                non_empty.len(),
                path.display()
            );
            report.outputs.push(path.clone());
            None
        }
        Err(e) if e.is_systemic() => {
            error!("  {} renderer unavailable: {}", renderer.name(), e);
            return report.failed(FileError::RendererUnavailable {
                detail: e.to_string(),
            });
        }
        Err(e) => {
            error!("  Failed to render {}: {}", path.display(), e);
            Some(e.to_string())
        }
    };

    for table in tables {
        if table.is_empty() {
            report.sheets.push(skipped(job, config, table));
            continue;
        }
        let outcome = match render_error {
            None => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_sheet_written(&job.input, &table.name, &path);
                }
                SheetOutcome::Combined
            }
            Some(ref detail) => {
                let err = SheetError::RenderFailed {
                    sheet: table.name.clone(),
                    detail: detail.clone(),
                };
                if let Some(ref cb) = config.progress_callback {
                    cb.on_sheet_error(&job.input, &table.name, &err.to_string());
                }
                SheetOutcome::Failed(err)
            }
        };
        report.sheets.push(SheetReport {
            sheet: table.name.clone(),
            rows: table.row_count(),
            outcome,
        });
    }

    report
}
