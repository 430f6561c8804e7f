//! # xlsx2pdf
//!
//! Batch-convert spreadsheet workbooks into PDF files, one PDF per sheet.
//!
//! Point it at a directory and every workbook inside (optionally the whole
//! subtree) is opened, each non-empty sheet is laid out as a styled HTML
//! table, and the table is printed to PDF. Output file names follow the
//! workbook name, with the sheet name appended when a workbook has more than
//! one sheet.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input dir
//!  │
//!  ├─ 1. Discover  walk the directory for matching extensions (walkdir)
//!  ├─ 2. Read      parse each sheet into a header + rows table (calamine)
//!  ├─ 3. Name      derive and de-duplicate the output path for every sheet
//!  ├─ 4. HTML      escaped <table> inside a UTF-8 document shell
//!  └─ 5. PDF       HTML + generated CSS → PDF via WeasyPrint, atomically
//! ```
//!
//! One bad workbook never stops the batch: per-file and per-sheet failures
//! are recorded in the returned [`BatchSummary`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xlsx2pdf::{run_batch, BatchConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BatchConfig::builder()
//!         .input_dir("input_xlsx_files")
//!         .output_dir("output_pdf_files")
//!         .recursive(true)
//!         .build()?;
//!     let summary = run_batch(&config)?;
//!     eprintln!(
//!         "{} PDF(s) written, {} file(s) failed",
//!         summary.stats.pdfs_written, summary.stats.files_failed
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `xlsx2pdf` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! xlsx2pdf = { version = "0.1", default-features = false }
//! ```
//!
//! ## Rendering engine
//!
//! PDFs are produced by the `weasyprint` executable, found through the
//! `WEASYPRINT_PATH` environment variable or `PATH`. Any other engine can be
//! plugged in by implementing [`PdfRenderer`] and passing it to
//! [`BatchConfigBuilder::renderer`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;
pub mod stylesheet;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{BatchConfig, BatchConfigBuilder, SheetLayout};
pub use convert::{convert_workbook, resolve_renderer, run_batch, ConversionJob};
pub use error::{BatchError, FileError, RenderError, SheetError};
pub use output::{BatchStats, BatchSummary, FileOutcome, FileReport, SheetOutcome, SheetReport};
pub use pipeline::pdf::{PdfRenderer, WeasyPrintRenderer};
pub use pipeline::read::{CellValue, SheetTable};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{batch_stream, BatchRun};
pub use stylesheet::{Orientation, PageSetup, PageSize};
