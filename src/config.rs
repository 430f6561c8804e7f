//! Configuration types for batch spreadsheet-to-PDF conversion.
//!
//! All run behaviour is controlled through [`BatchConfig`], built via its
//! [`BatchConfigBuilder`]. The config is an explicit value handed to the
//! driver, never process-wide state, so two runs with different settings can
//! coexist in one process and tests can build throwaway configs freely.

use crate::error::BatchError;
use crate::pipeline::pdf::PdfRenderer;
use crate::progress::ProgressCallback;
use crate::stylesheet::PageSetup;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for a batch conversion run.
///
/// Built via [`BatchConfig::builder()`].
///
/// # Example
/// ```rust
/// use xlsx2pdf::{BatchConfig, SheetLayout};
///
/// let config = BatchConfig::builder()
///     .input_dir("input_xlsx_files")
///     .output_dir("output_pdf_files")
///     .recursive(true)
///     .layout(SheetLayout::PerSheet)
///     .build()
///     .unwrap();
/// assert!(config.mirror_subfolders);
/// ```
#[derive(Clone)]
pub struct BatchConfig {
    /// Directory scanned for spreadsheet files. Default: `input_xlsx_files`.
    pub input_dir: PathBuf,

    /// Root directory PDFs are written to. Default: `output_pdf_files`.
    pub output_dir: PathBuf,

    /// Descend into subdirectories of `input_dir`. Default: false.
    pub recursive: bool,

    /// When `recursive` is on, recreate each file's subdirectory under
    /// `output_dir`. Ignored otherwise. Default: true.
    pub mirror_subfolders: bool,

    /// File extensions (without dot, matched case-insensitively). Default: `["xlsx"]`.
    pub extensions: Vec<String>,

    /// One PDF per sheet, or one per workbook. Default: [`SheetLayout::PerSheet`].
    pub layout: SheetLayout,

    /// Paper size, orientation, margins and base font size.
    pub page_setup: PageSetup,

    /// Extra CSS appended after the built-in stylesheet (e.g. `@font-face`).
    pub extra_css: Option<String>,

    /// Explicit WeasyPrint executable; overrides `WEASYPRINT_PATH` and `PATH`.
    pub weasyprint_path: Option<PathBuf>,

    /// Pre-constructed renderer. Takes precedence over `weasyprint_path`.
    pub renderer: Option<Arc<dyn PdfRenderer>>,

    /// Optional per-file / per-sheet progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input_xlsx_files"),
            output_dir: PathBuf::from("output_pdf_files"),
            recursive: false,
            mirror_subfolders: true,
            extensions: vec!["xlsx".to_string()],
            layout: SheetLayout::default(),
            page_setup: PageSetup::default(),
            extra_css: None,
            weasyprint_path: None,
            renderer: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for BatchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchConfig")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("recursive", &self.recursive)
            .field("mirror_subfolders", &self.mirror_subfolders)
            .field("extensions", &self.extensions)
            .field("layout", &self.layout)
            .field("page_setup", &self.page_setup)
            .field("extra_css", &self.extra_css.as_ref().map(|s| s.len()))
            .field("weasyprint_path", &self.weasyprint_path)
            .field("renderer", &self.renderer.as_ref().map(|_| "<dyn PdfRenderer>"))
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl BatchConfig {
    /// Create a new builder for `BatchConfig`.
    pub fn builder() -> BatchConfigBuilder {
        BatchConfigBuilder {
            config: Self::default(),
        }
    }

    /// Whether output paths should follow the input subdirectory layout.
    pub fn mirrors_output(&self) -> bool {
        self.recursive && self.mirror_subfolders
    }
}

/// Builder for [`BatchConfig`].
#[derive(Debug)]
pub struct BatchConfigBuilder {
    config: BatchConfig,
}

impl BatchConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn recursive(mut self, v: bool) -> Self {
        self.config.recursive = v;
        self
    }

    pub fn mirror_subfolders(mut self, v: bool) -> Self {
        self.config.mirror_subfolders = v;
        self
    }

    /// Replace the extension filter. Leading dots are stripped.
    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.extensions = exts
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    pub fn layout(mut self, layout: SheetLayout) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn page_setup(mut self, setup: PageSetup) -> Self {
        self.config.page_setup = setup;
        self
    }

    pub fn extra_css(mut self, css: impl Into<String>) -> Self {
        self.config.extra_css = Some(css.into());
        self
    }

    pub fn weasyprint_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.weasyprint_path = Some(path.into());
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn PdfRenderer>) -> Self {
        self.config.renderer = Some(renderer);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// Whether `input_dir` exists is checked when the run starts, not here.
    pub fn build(self) -> Result<BatchConfig, BatchError> {
        let c = &self.config;
        if c.input_dir.as_os_str().is_empty() {
            return Err(BatchError::InvalidConfig("input directory is empty".into()));
        }
        if c.output_dir.as_os_str().is_empty() {
            return Err(BatchError::InvalidConfig("output directory is empty".into()));
        }
        if c.extensions.is_empty() {
            return Err(BatchError::InvalidConfig(
                "at least one file extension is required".into(),
            ));
        }
        let font = c.page_setup.font_size_pt;
        if font.is_nan() || font <= 0.0 {
            return Err(BatchError::InvalidConfig(format!(
                "font size must be > 0, got {font}"
            )));
        }
        if c.page_setup.margin.trim().is_empty() {
            return Err(BatchError::InvalidConfig("page margin is empty".into()));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How sheets of one workbook map onto PDF files.
///
/// | Layout | Output |
/// |--------|--------|
/// | `PerSheet` | `{base}.pdf` for a single-sheet workbook, else `{base}_{sheet}.pdf` per sheet |
/// | `Combined` | one `{base}.pdf` with a captioned table per non-empty sheet |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SheetLayout {
    /// One PDF per non-empty sheet. (default)
    #[default]
    PerSheet,
    /// All non-empty sheets in a single PDF.
    Combined,
}
