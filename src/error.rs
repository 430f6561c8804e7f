//! Error types for the xlsx2pdf library.
//!
//! Three error types reflect three distinct blast radii:
//!
//! * [`BatchError`] (**fatal**): the run cannot start at all (missing input
//!   directory, invalid configuration, unwritable output root). Returned as
//!   `Err(BatchError)` from [`crate::run_batch`] and [`crate::batch_stream`].
//!
//! * [`FileError`] (**per-file**): one workbook could not be converted
//!   (deleted since discovery, corrupt, renderer missing). Stored inside
//!   [`crate::output::FileReport`]; the batch moves on to the next file.
//!
//! * [`SheetError`] (**per-sheet**): one sheet failed to render while its
//!   siblings are fine. Stored inside [`crate::output::SheetReport`].
//!
//! [`RenderError`] is the boundary type of the HTML → PDF renderer; the
//! driver maps it onto `FileError` or `SheetError` depending on whether the
//! cause is systemic (engine missing) or local to one document.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the xlsx2pdf library.
///
/// Per-file and per-sheet failures use [`FileError`] / [`SheetError`] and are
/// recorded in the batch summary rather than propagated here.
#[derive(Debug, Error)]
pub enum BatchError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The configured input directory does not exist or is not a directory.
    #[error("Input directory '{path}' not found.\nPlease create it and add spreadsheet files.")]
    InputDirNotFound { path: PathBuf },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The output root could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A recoverable error for a single workbook.
///
/// The batch continues with the next discovered file.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum FileError {
    /// The file vanished between discovery and conversion.
    #[error("Spreadsheet file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'")]
    PermissionDenied { path: PathBuf },

    /// The reader could not open the workbook (corrupt or unsupported format).
    #[error("Workbook '{path}' could not be read: {detail}")]
    CorruptWorkbook { path: PathBuf, detail: String },

    /// A sheet's cell data could not be parsed.
    #[error("Sheet '{sheet}' could not be read: {detail}")]
    SheetReadFailed { sheet: String, detail: String },

    /// The HTML → PDF engine is not available on this machine.
    ///
    /// The cause is systemic, so this usually repeats for every file.
    #[error("PDF renderer unavailable: {detail}")]
    RendererUnavailable { detail: String },

    /// A mirrored output subdirectory could not be created.
    #[error("Failed to create output directory '{path}': {detail}")]
    OutputDirCreateFailed { path: PathBuf, detail: String },
}

/// A recoverable error for a single sheet.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SheetError {
    /// The renderer failed to produce the PDF for this sheet.
    #[error("Sheet '{sheet}': PDF rendering failed: {detail}")]
    RenderFailed { sheet: String, detail: String },
}

/// Errors raised by a [`crate::pipeline::pdf::PdfRenderer`].
#[derive(Debug, Error)]
pub enum RenderError {
    /// The rendering engine could not be found or launched.
    #[error("rendering engine not available: {0}")]
    EngineNotFound(String),

    /// Reading or writing temporary / output files failed.
    #[error("I/O error while rendering: {0}")]
    Io(#[from] std::io::Error),

    /// The engine ran but reported failure.
    #[error("rendering engine exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },
}

impl RenderError {
    /// `true` when retrying on another document cannot help.
    pub fn is_systemic(&self) -> bool {
        matches!(self, RenderError::EngineNotFound(_))
    }
}
