//! Progress-callback trait for per-file and per-sheet batch events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::BatchConfigBuilder::progress_callback`] to receive events
//! as the driver works through the batch. The CLI uses this to drive its
//! progress bar; library users can forward events anywhere they like.
//!
//! Events arrive strictly in processing order: one file is finished before
//! the next one starts.
//!
//! # Example
//!
//! ```rust
//! use xlsx2pdf::{BatchConfig, ConversionProgressCallback};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     written: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_sheet_written(&self, _input: &Path, sheet: &str, output: &Path) {
//!         self.written.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{sheet} -> {}", output.display());
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { written: AtomicUsize::new(0) });
//!
//! let config = BatchConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{BatchSummary, FileReport};
use std::path::Path;
use std::sync::Arc;

/// Called by the batch driver as it processes each file and sheet.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once after discovery, before the first file is opened.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called before a workbook is opened.
    ///
    /// # Arguments
    /// * `index` — 1-indexed position in the batch
    fn on_file_start(&self, index: usize, total_files: usize, input: &Path) {
        let _ = (index, total_files, input);
    }

    /// Called after a sheet's PDF has been written.
    fn on_sheet_written(&self, input: &Path, sheet: &str, output: &Path) {
        let _ = (input, sheet, output);
    }

    /// Called when a sheet is skipped because it has no data rows.
    fn on_sheet_skipped(&self, input: &Path, sheet: &str) {
        let _ = (input, sheet);
    }

    /// Called when a sheet fails to render.
    fn on_sheet_error(&self, input: &Path, sheet: &str, error: &str) {
        let _ = (input, sheet, error);
    }

    /// Called once a workbook has been fully handled, successfully or not.
    fn on_file_complete(&self, index: usize, total_files: usize, report: &FileReport) {
        let _ = (index, total_files, report);
    }

    /// Called once after every file has been attempted.
    fn on_batch_complete(&self, summary: &BatchSummary) {
        let _ = summary;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::BatchConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::FileOutcome;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        total: AtomicUsize,
        files: AtomicUsize,
        written: AtomicUsize,
        skipped: AtomicUsize,
        errors: AtomicUsize,
        completed: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_batch_start(&self, total_files: usize) {
            self.total.store(total_files, Ordering::SeqCst);
        }

        fn on_file_start(&self, _index: usize, _total: usize, _input: &Path) {
            self.files.fetch_add(1, Ordering::SeqCst);
        }

        fn on_sheet_written(&self, _input: &Path, _sheet: &str, _output: &Path) {
            self.written.fetch_add(1, Ordering::SeqCst);
        }

        fn on_sheet_skipped(&self, _input: &Path, _sheet: &str) {
            self.skipped.fetch_add(1, Ordering::SeqCst);
        }

        fn on_sheet_error(&self, _input: &Path, _sheet: &str, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_batch_complete(&self, summary: &BatchSummary) {
            self.completed.store(summary.stats.files_total, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        let input = Path::new("in/a.xlsx");
        cb.on_batch_start(2);
        cb.on_file_start(1, 2, input);
        cb.on_sheet_written(input, "Sheet1", Path::new("out/a.pdf"));
        cb.on_sheet_skipped(input, "Empty");
        cb.on_sheet_error(input, "Bad", "renderer exited with 1");
        let report = FileReport {
            input: PathBuf::from("in/a.xlsx"),
            output_dir: PathBuf::from("out"),
            outcome: FileOutcome::Converted,
            sheets: vec![],
            outputs: vec![],
        };
        cb.on_file_complete(1, 2, &report);
        cb.on_batch_complete(&BatchSummary::default());
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        let input = Path::new("in/a.xlsx");

        tracker.on_batch_start(3);
        assert_eq!(tracker.total.load(Ordering::SeqCst), 3);

        tracker.on_file_start(1, 3, input);
        tracker.on_sheet_written(input, "Q1", Path::new("out/a_Q1.pdf"));
        tracker.on_sheet_skipped(input, "Notes");
        tracker.on_sheet_error(input, "Q2", "boom");

        assert_eq!(tracker.files.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.written.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.skipped.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);

        let mut summary = BatchSummary::default();
        summary.stats.files_total = 3;
        tracker.on_batch_complete(&summary);
        assert_eq!(tracker.completed.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_batch_start(10);
        cb.on_file_start(1, 10, Path::new("a.xlsx"));
    }
}
