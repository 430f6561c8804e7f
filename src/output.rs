//! Typed results of a batch run.
//!
//! Every unit of work returns a value instead of only logging: each sheet
//! yields a [`SheetReport`], each workbook a [`FileReport`], and the driver
//! aggregates them into a [`BatchSummary`]. The log lines and the summary
//! are produced from the same values, so tests (and `--json` consumers) can
//! check exactly what a human would have read on the console.

use crate::error::{FileError, SheetError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetOutcome {
    /// A PDF was written at this path.
    Written { output: PathBuf },
    /// The sheet was included in the workbook's combined PDF.
    Combined,
    /// The sheet has no data rows; nothing was written.
    SkippedEmpty,
    /// Rendering failed; siblings were still processed.
    Failed(SheetError),
}

/// Per-sheet record inside a [`FileReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetReport {
    /// Sheet name as stored in the workbook.
    pub sheet: String,
    /// Number of data rows (header excluded).
    pub rows: usize,
    pub outcome: SheetOutcome,
}

/// What happened to one workbook as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileOutcome {
    /// The workbook was processed. Individual sheets may still have failed
    /// to render; see [`FileReport::sheet_errors`].
    Converted,
    /// The workbook contains no sheets at all.
    NoSheets,
    /// All sheets were empty; no PDF was produced.
    AllSheetsEmpty,
    /// Every non-empty sheet failed to render; no PDF was produced.
    AllSheetsFailed,
    /// The workbook could not be processed.
    Failed(FileError),
}

/// Result of converting one discovered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// Input spreadsheet path.
    pub input: PathBuf,
    /// Directory the PDFs for this file were (or would have been) written to.
    pub output_dir: PathBuf,
    pub outcome: FileOutcome,
    /// Sheets processed before the outcome was decided, in workbook order.
    pub sheets: Vec<SheetReport>,
    /// Every PDF path written for this file, in write order.
    pub outputs: Vec<PathBuf>,
}

impl FileReport {
    pub(crate) fn new(input: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            input,
            output_dir,
            outcome: FileOutcome::Converted,
            sheets: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub(crate) fn failed(mut self, err: FileError) -> Self {
        self.outcome = FileOutcome::Failed(err);
        self
    }

    /// `true` unless the whole file failed.
    pub fn is_ok(&self) -> bool {
        !matches!(
            self.outcome,
            FileOutcome::Failed(_) | FileOutcome::AllSheetsFailed
        )
    }

    /// The file-level error, if any.
    pub fn error(&self) -> Option<&FileError> {
        match &self.outcome {
            FileOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Sheets that failed to render.
    pub fn sheet_errors(&self) -> impl Iterator<Item = &SheetError> {
        self.sheets.iter().filter_map(|s| match &s.outcome {
            SheetOutcome::Failed(e) => Some(e),
            _ => None,
        })
    }
}

/// Aggregate counts for a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Files discovered and attempted.
    pub files_total: usize,
    /// Files that produced at least their expected outputs.
    pub files_converted: usize,
    /// Files with no sheets or only empty sheets.
    pub files_skipped: usize,
    /// Files aborted with a [`FileError`] or whose every sheet failed.
    pub files_failed: usize,
    /// PDF files written.
    pub pdfs_written: usize,
    /// Sheets skipped because they had no data rows.
    pub sheets_skipped_empty: usize,
    /// Sheets whose rendering failed.
    pub sheets_failed: usize,
    /// Wall-clock duration of the run.
    pub total_duration_ms: u64,
}

/// Machine-checkable record of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Per-file reports in processing order.
    pub files: Vec<FileReport>,
    pub stats: BatchStats,
}

impl BatchSummary {
    /// Fold one file report into the summary.
    pub fn record(&mut self, report: FileReport) {
        let stats = &mut self.stats;
        stats.files_total += 1;
        match report.outcome {
            FileOutcome::Converted => stats.files_converted += 1,
            FileOutcome::NoSheets | FileOutcome::AllSheetsEmpty => stats.files_skipped += 1,
            FileOutcome::Failed(_) | FileOutcome::AllSheetsFailed => stats.files_failed += 1,
        }
        stats.pdfs_written += report.outputs.len();
        for sheet in &report.sheets {
            match sheet.outcome {
                SheetOutcome::SkippedEmpty => stats.sheets_skipped_empty += 1,
                SheetOutcome::Failed(_) => stats.sheets_failed += 1,
                SheetOutcome::Written { .. } | SheetOutcome::Combined => {}
            }
        }
        self.files.push(report);
    }

    /// Every PDF written during the run.
    pub fn outputs(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter().flat_map(|f| f.outputs.iter())
    }

    /// `true` when no file or sheet failed.
    pub fn is_clean(&self) -> bool {
        self.stats.files_failed == 0 && self.stats.sheets_failed == 0
    }
}
