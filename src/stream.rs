//! Incremental batch API: yield one file report at a time.
//!
//! [`batch_stream`] does the up-front validation (input directory exists,
//! output root can be created) eagerly and then hands back a [`BatchRun`]
//! iterator. Each call to `next()` converts exactly one workbook and returns
//! its [`FileReport`], so callers can print, persist or stop between files.
//!
//! [`crate::convert::run_batch`] is this iterator drained into a summary
//! with [`BatchRun::finish`].
//!
//! Fatal errors are returned, not logged; reporting them is the caller's job.

use crate::config::BatchConfig;
use crate::convert::{convert_workbook, resolve_renderer, ConversionJob};
use crate::error::{BatchError, FileError};
use crate::output::{BatchSummary, FileReport};
use crate::pipeline::discover::{discover, DiscoveredFile};
use crate::pipeline::pdf::PdfRenderer;
use std::fs;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Iterator over the files of a batch, converting each one as it is pulled.
///
/// Files are processed in discovery order, one at a time.
pub struct BatchRun {
    config: BatchConfig,
    files: std::vec::IntoIter<DiscoveredFile>,
    total: usize,
    index: usize,
    started: Instant,
    /// Resolved on the first file so an empty batch never probes for an engine.
    renderer: Option<Result<Arc<dyn PdfRenderer>, FileError>>,
}

impl BatchRun {
    /// Number of files discovered for this run.
    pub fn total_files(&self) -> usize {
        self.total
    }

    /// Number of files not yet converted.
    pub fn remaining(&self) -> usize {
        self.total - self.index
    }

    /// Convert the remaining files and fold their reports into a summary.
    ///
    /// Fires `on_batch_complete` once the last file is done.
    pub fn finish(self) -> BatchSummary {
        let started = self.started;
        let callback = self.config.progress_callback.clone();

        let mut summary = BatchSummary::default();
        for report in self {
            summary.record(report);
        }
        summary.stats.total_duration_ms = started.elapsed().as_millis() as u64;

        let s = &summary.stats;
        info!(
            "Batch conversion finished: {} converted, {} skipped, {} failed, {} PDF(s) written in {}ms",
            s.files_converted, s.files_skipped, s.files_failed, s.pdfs_written, s.total_duration_ms
        );

        if let Some(cb) = callback {
            cb.on_batch_complete(&summary);
        }
        summary
    }

    fn renderer(&mut self) -> Result<Arc<dyn PdfRenderer>, FileError> {
        let config = &self.config;
        self.renderer
            .get_or_insert_with(|| {
                resolve_renderer(config).map_err(|e| {
                    error!("PDF renderer unavailable: {}", e);
                    FileError::RendererUnavailable {
                        detail: e.to_string(),
                    }
                })
            })
            .clone()
    }
}

impl Iterator for BatchRun {
    type Item = FileReport;

    fn next(&mut self) -> Option<FileReport> {
        let file = self.files.next()?;
        self.index += 1;

        let job = ConversionJob::for_discovered(&file, &self.config);
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_file_start(self.index, self.total, &job.input);
        }

        let report = match self.renderer() {
            Ok(renderer) => convert_workbook(&job, &self.config, renderer.as_ref()),
            Err(e) => {
                error!("  Error processing {}: {}", job.input.display(), e);
                FileReport::new(job.input.clone(), job.output_dir.clone()).failed(e)
            }
        };

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_file_complete(self.index, self.total, &report);
        }
        Some(report)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for BatchRun {}

/// Validate the run and discover its files, returning a lazy converter.
///
/// # Errors
/// - [`BatchError::InputDirNotFound`]: nothing is created, nothing is written
/// - [`BatchError::OutputDirCreateFailed`]: the output root could not be made
pub fn batch_stream(config: &BatchConfig) -> Result<BatchRun, BatchError> {
    let started = Instant::now();
    let discovery = discover(&config.input_dir, config.recursive, &config.extensions)?;

    fs::create_dir_all(&config.output_dir).map_err(|source| BatchError::OutputDirCreateFailed {
        path: config.output_dir.clone(),
        source,
    })?;

    let files: Vec<DiscoveredFile> = discovery.collect();
    if files.is_empty() {
        info!(
            "No {} files found in '{}'",
            describe_extensions(&config.extensions),
            config.input_dir.display()
        );
    } else {
        info!(
            "Found {} file(s) to convert in '{}'",
            files.len(),
            config.input_dir.display()
        );
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(files.len());
    }

    Ok(BatchRun {
        config: config.clone(),
        total: files.len(),
        files: files.into_iter(),
        index: 0,
        started,
        renderer: None,
    })
}

fn describe_extensions(exts: &[String]) -> String {
    exts.iter()
        .map(|e| format!(".{e}"))
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use std::path::Path;

    struct StubRenderer;

    impl PdfRenderer for StubRenderer {
        fn render(&self, _html: &str, _css: &str, output: &Path) -> Result<(), RenderError> {
            fs::write(output, b"%PDF-1.4\n")?;
            Ok(())
        }
    }

    #[test]
    fn missing_input_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let cfg = BatchConfig::builder()
            .input_dir(dir.path().join("missing"))
            .output_dir(&out)
            .build()
            .unwrap();

        assert!(matches!(
            batch_stream(&cfg),
            Err(BatchError::InputDirNotFound { .. })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn empty_input_yields_no_reports_but_creates_output_root() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir(&input).unwrap();
        let out = dir.path().join("out");
        let cfg = BatchConfig::builder()
            .input_dir(&input)
            .output_dir(&out)
            .renderer(Arc::new(StubRenderer))
            .build()
            .unwrap();

        let run = batch_stream(&cfg).unwrap();
        assert_eq!(run.total_files(), 0);
        assert_eq!(run.count(), 0);
        assert!(out.is_dir());
    }

    #[test]
    fn corrupt_files_are_reported_one_by_one() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("a.xlsx"), b"not a workbook").unwrap();
        fs::write(input.join("b.xlsx"), b"also not a workbook").unwrap();
        let cfg = BatchConfig::builder()
            .input_dir(&input)
            .output_dir(dir.path().join("out"))
            .renderer(Arc::new(StubRenderer))
            .build()
            .unwrap();

        let mut run = batch_stream(&cfg).unwrap();
        assert_eq!(run.len(), 2);

        let first = run.next().unwrap();
        assert!(first.input.ends_with("a.xlsx"));
        assert!(matches!(first.error(), Some(FileError::CorruptWorkbook { .. })));
        assert_eq!(run.remaining(), 1);

        let second = run.next().unwrap();
        assert!(second.input.ends_with("b.xlsx"));
        assert!(run.next().is_none());
    }

    #[test]
    fn finish_drains_remaining_files_into_summary() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("a.xlsx"), b"not a workbook").unwrap();
        fs::write(input.join("b.xlsx"), b"not a workbook").unwrap();
        let cfg = BatchConfig::builder()
            .input_dir(&input)
            .output_dir(dir.path().join("out"))
            .renderer(Arc::new(StubRenderer))
            .build()
            .unwrap();

        let mut run = batch_stream(&cfg).unwrap();
        run.next().unwrap();
        let summary = run.finish();

        assert_eq!(summary.stats.files_total, 1);
        assert!(summary.files[0].input.ends_with("b.xlsx"));
        assert_eq!(summary.stats.files_failed, 1);
    }

    #[test]
    fn extension_list_is_described_for_logs() {
        assert_eq!(describe_extensions(&["xlsx".into()]), ".xlsx");
        assert_eq!(describe_extensions(&["xlsx".into(), "ods".into()]), ".xlsx/.ods");
    }
}
