//! CLI binary for xlsx2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `BatchConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use xlsx2pdf::{
    batch_stream, BatchConfig, BatchSummary, ConversionProgressCallback, FileOutcome, FileReport,
    Orientation, PageSetup, PageSize, ProgressCallback, SheetLayout,
};

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over files, one log line per sheet.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Root the per-sheet output paths are shown relative to.
    output_root: PathBuf,
    sheet_errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new(output_root: &Path) -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.set_message("Looking for spreadsheets…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            output_root: output_root.to_path_buf(),
            sheet_errors: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.reset_eta();
    }

    /// Print a line above the bar without tearing it.
    fn note(&self, line: String) {
        self.bar.println(line);
    }

    fn short<'a>(&self, path: &'a Path) -> std::borrow::Cow<'a, str> {
        path.strip_prefix(&self.output_root)
            .unwrap_or(path)
            .to_string_lossy()
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.activate_bar(total_files);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total_files} file(s) to convert"))
        ));
    }

    fn on_file_start(&self, index: usize, total_files: usize, input: &Path) {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar.set_message(name.clone());
        self.bar.println(format!(
            "{} {:>3}/{:<3} {}",
            cyan("▸"),
            index,
            total_files,
            bold(&name)
        ));
    }

    fn on_sheet_written(&self, _input: &Path, sheet: &str, output: &Path) {
        self.bar.println(format!(
            "    {} {:<24} {}",
            green("✓"),
            sheet,
            dim(&format!("→ {}", self.short(output)))
        ));
    }

    fn on_sheet_skipped(&self, _input: &Path, sheet: &str) {
        self.bar.println(format!(
            "    {} {:<24} {}",
            dim("·"),
            sheet,
            dim("empty, skipped")
        ));
    }

    fn on_sheet_error(&self, _input: &Path, sheet: &str, error: &str) {
        self.sheet_errors.fetch_add(1, Ordering::SeqCst);
        self.bar.println(format!(
            "    {} {:<24} {}",
            red("✗"),
            sheet,
            red(&truncate(error, 80))
        ));
    }

    fn on_file_complete(&self, _index: usize, _total: usize, report: &FileReport) {
        match &report.outcome {
            FileOutcome::Failed(e) => {
                self.bar
                    .println(format!("    {} {}", red("✗"), red(&truncate(&e.to_string(), 100))));
            }
            FileOutcome::NoSheets => {
                self.bar
                    .println(format!("    {} {}", yellow("⚠"), dim("workbook has no sheets")));
            }
            FileOutcome::AllSheetsEmpty => {
                self.bar
                    .println(format!("    {} {}", dim("·"), dim("all sheets empty, nothing written")));
            }
            FileOutcome::AllSheetsFailed => {
                self.bar
                    .println(format!("    {} {}", red("✗"), red("every sheet failed to render")));
            }
            FileOutcome::Converted => {}
        }
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, summary: &BatchSummary) {
        self.bar.finish_and_clear();
        let s = &summary.stats;

        if summary.is_clean() {
            eprintln!(
                "{} {} PDF(s) written from {} file(s)  {}",
                green("✔"),
                bold(&s.pdfs_written.to_string()),
                s.files_total,
                dim(&format!("{}ms", s.total_duration_ms)),
            );
        } else {
            eprintln!(
                "{} {} PDF(s) written  ({} file(s) failed, {} sheet(s) failed)  {}",
                if s.pdfs_written == 0 { red("✘") } else { cyan("⚠") },
                bold(&s.pdfs_written.to_string()),
                red(&s.files_failed.to_string()),
                red(&self.sheet_errors.load(Ordering::SeqCst).to_string()),
                dim(&format!("{}ms", s.total_duration_ms)),
            );
        }
    }
}

/// Shorten long messages to keep output tidy.
fn truncate(msg: &str, max_chars: usize) -> String {
    if msg.chars().count() > max_chars {
        let cut: String = msg.chars().take(max_chars - 1).collect();
        format!("{cut}\u{2026}")
    } else {
        msg.to_string()
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert every .xlsx in ./input_xlsx_files into ./output_pdf_files
  xlsx2pdf

  # Explicit directories, walk subfolders and mirror them in the output
  xlsx2pdf reports/ -o pdf/ --recursive

  # Flatten all subfolders into one output directory
  xlsx2pdf reports/ -o pdf/ --recursive --no-mirror

  # One PDF per workbook instead of one per sheet
  xlsx2pdf reports/ --combine-sheets

  # Also pick up .xlsm and .ods files, print on portrait Letter paper
  xlsx2pdf reports/ --ext xlsx --ext xlsm --ext ods --page-size letter --portrait

  # Custom fonts / colours appended to the built-in stylesheet
  xlsx2pdf reports/ --stylesheet brand.css

  # Machine-readable summary
  xlsx2pdf reports/ --json > summary.json

OUTPUT NAMING:
  Workbook with one sheet      {output}/{workbook}.pdf
  Workbook with several sheets {output}/{workbook}_{sheet}.pdf
  --combine-sheets             {output}/{workbook}.pdf

  Characters other than letters, digits, space, '_' and '-' in sheet names
  become '_'. Sheets without data rows are skipped.

ENVIRONMENT VARIABLES:
  WEASYPRINT_PATH   Path to the weasyprint executable (otherwise found on PATH)
  RUST_LOG          Override log filtering (e.g. RUST_LOG=xlsx2pdf=debug)
  XLSX2PDF_*        Every flag can also be set via its XLSX2PDF_ variable

SETUP:
  PDF rendering uses WeasyPrint (https://weasyprint.org):
    pip install weasyprint
"#;

/// Convert every sheet of every spreadsheet in a directory to PDF.
#[derive(Parser, Debug)]
#[command(
    name = "xlsx2pdf",
    version,
    about = "Batch-convert spreadsheet workbooks to PDF, one file per sheet",
    long_about = "Scan a directory for spreadsheet workbooks and render each non-empty sheet \
as a styled table in its own PDF. Workbooks that fail to open are reported and skipped; \
the rest of the batch still runs.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the spreadsheets.
    #[arg(env = "XLSX2PDF_INPUT", default_value = "input_xlsx_files")]
    input_dir: PathBuf,

    /// Directory PDFs are written to (created if missing).
    #[arg(short, long, env = "XLSX2PDF_OUTPUT", default_value = "output_pdf_files")]
    output: PathBuf,

    /// Also convert files in subdirectories.
    #[arg(short, long, env = "XLSX2PDF_RECURSIVE")]
    recursive: bool,

    /// With --recursive, write all PDFs directly into the output directory.
    #[arg(long, env = "XLSX2PDF_NO_MIRROR")]
    no_mirror: bool,

    /// Write one PDF per workbook containing every non-empty sheet.
    #[arg(long, env = "XLSX2PDF_COMBINE_SHEETS")]
    combine_sheets: bool,

    /// File extension to convert (repeatable or comma-separated).
    #[arg(
        long = "ext",
        value_name = "EXT",
        env = "XLSX2PDF_EXTENSIONS",
        default_value = "xlsx",
        value_delimiter = ','
    )]
    extensions: Vec<String>,

    /// Paper size: a3, a4, a5, letter, legal.
    #[arg(long, env = "XLSX2PDF_PAGE_SIZE", default_value = "a4", value_parser = parse_page_size)]
    page_size: PageSize,

    /// Portrait pages instead of landscape.
    #[arg(long, env = "XLSX2PDF_PORTRAIT")]
    portrait: bool,

    /// Page margin as a CSS length (e.g. 0.75in, 15mm).
    #[arg(long, env = "XLSX2PDF_MARGIN", default_value = "0.75in")]
    margin: String,

    /// Table font size in points.
    #[arg(long, env = "XLSX2PDF_FONT_SIZE", default_value_t = 9.0)]
    font_size: f32,

    /// CSS file appended after the built-in stylesheet.
    #[arg(long, value_name = "FILE", env = "XLSX2PDF_STYLESHEET")]
    stylesheet: Option<PathBuf>,

    /// Path to the weasyprint executable.
    #[arg(long, value_name = "PATH", env = "XLSX2PDF_WEASYPRINT")]
    weasyprint: Option<PathBuf>,

    /// Print the batch summary as JSON on stdout.
    #[arg(long, env = "XLSX2PDF_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "XLSX2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "XLSX2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "XLSX2PDF_QUIET")]
    quiet: bool,
}

fn parse_page_size(s: &str) -> Result<PageSize, String> {
    s.parse()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let cli_progress = show_progress.then(|| CliProgressCallback::new(&cli.output));
    let progress_cb: Option<ProgressCallback> = cli_progress
        .clone()
        .map(|cb| cb as Arc<dyn ConversionProgressCallback>);

    let config = build_config(&cli, progress_cb)?;

    // ── Validate input and discover files ────────────────────────────────
    // Fatal errors are printed here once, without an error chain.
    let run = match batch_stream(&config) {
        Ok(run) => run,
        Err(e) => {
            if let Some(ref cb) = cli_progress {
                cb.bar.finish_and_clear();
            }
            eprintln!("{} {}", red("✗"), e);
            std::process::exit(1);
        }
    };

    // ── Check for WeasyPrint ─────────────────────────────────────────────
    // A missing engine is not fatal: every file is reported as failed and
    // the summary says why.
    if cli.weasyprint.is_none() && run.total_files() > 0 {
        match weasyprint_locate::locate_weasyprint() {
            Ok(exe) => {
                if cli.verbose {
                    if let Ok(version) = weasyprint_locate::weasyprint_version(&exe) {
                        tracing::debug!("Using {} ({})", exe.display(), version);
                    }
                }
            }
            Err(e) if !cli.quiet => {
                let line = format!("{} {}", yellow("⚠"), e);
                match cli_progress {
                    Some(ref cb) => cb.note(line),
                    None => eprintln!("{line}"),
                }
            }
            Err(_) => {}
        }
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let summary = run.finish();

    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?;
        println!("{json}");
    } else if !cli.quiet && !show_progress {
        // Only print inline stats when the progress callback is disabled.
        let s = &summary.stats;
        eprintln!(
            "Converted {}/{} file(s), {} PDF(s) written in {}ms",
            s.files_converted, s.files_total, s.pdfs_written, s.total_duration_ms
        );
        if s.files_failed > 0 || s.sheets_failed > 0 {
            eprintln!(
                "  {} file(s) failed, {} sheet(s) failed",
                s.files_failed, s.sheets_failed
            );
        }
    }

    Ok(())
}

/// Map CLI args to `BatchConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<BatchConfig> {
    let page_setup = PageSetup {
        size: cli.page_size,
        orientation: if cli.portrait {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        },
        margin: cli.margin.clone(),
        font_size_pt: cli.font_size,
    };

    let layout = if cli.combine_sheets {
        SheetLayout::Combined
    } else {
        SheetLayout::PerSheet
    };

    let mut builder = BatchConfig::builder()
        .input_dir(&cli.input_dir)
        .output_dir(&cli.output)
        .recursive(cli.recursive)
        .mirror_subfolders(!cli.no_mirror)
        .extensions(&cli.extensions)
        .layout(layout)
        .page_setup(page_setup);

    if let Some(ref path) = cli.stylesheet {
        let css = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stylesheet from {:?}", path))?;
        builder = builder.extra_css(css);
    }

    if let Some(ref exe) = cli.weasyprint {
        builder = builder.weasyprint_path(exe);
    }

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
