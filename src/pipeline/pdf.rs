//! HTML → PDF rendering.
//!
//! [`PdfRenderer`] is the seam between the batch driver and whatever engine
//! lays out the document. The default [`WeasyPrintRenderer`] drives the
//! `weasyprint` executable; tests inject a fake that records documents.
//!
//! ## Atomic output
//!
//! The engine writes into a temporary file next to the destination, which is
//! renamed into place only after the engine reports success. A failed or
//! interrupted render never leaves a truncated PDF at the final path.

use crate::error::RenderError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;
use weasyprint_locate::locate_weasyprint;

/// Renders an HTML document plus stylesheet to a PDF file.
pub trait PdfRenderer: Send + Sync {
    /// Write a PDF of `html` styled with `css` to `output`.
    ///
    /// The parent directory of `output` must already exist.
    fn render(&self, html: &str, css: &str, output: &Path) -> Result<(), RenderError>;

    /// Short engine name for log lines.
    fn name(&self) -> &str {
        "pdf"
    }
}

/// Renderer backed by the WeasyPrint command-line tool.
#[derive(Debug, Clone)]
pub struct WeasyPrintRenderer {
    exe: PathBuf,
}

impl WeasyPrintRenderer {
    /// Use an explicit executable path.
    pub fn new(exe: impl Into<PathBuf>) -> Self {
        Self { exe: exe.into() }
    }

    /// Find the executable via `WEASYPRINT_PATH` or `PATH`.
    pub fn locate() -> Result<Self, RenderError> {
        locate_weasyprint()
            .map(Self::new)
            .map_err(|e| RenderError::EngineNotFound(e.to_string()))
    }

    pub fn executable(&self) -> &Path {
        &self.exe
    }
}

impl PdfRenderer for WeasyPrintRenderer {
    fn render(&self, html: &str, css: &str, output: &Path) -> Result<(), RenderError> {
        let dest_dir = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        // Inputs live in a scratch dir; the staged PDF sits beside its target
        // so the final rename never crosses filesystems.
        let scratch = tempfile::Builder::new().prefix("xlsx2pdf-").tempdir()?;
        let html_path = scratch.path().join("document.html");
        let css_path = scratch.path().join("style.css");
        fs::write(&html_path, html)?;
        fs::write(&css_path, css)?;

        let staged = tempfile::Builder::new()
            .prefix(".xlsx2pdf-")
            .suffix(".pdf.part")
            .tempfile_in(dest_dir)?
            .into_temp_path();

        debug!(
            "Running {} for {}",
            self.exe.display(),
            output.display()
        );

        let result = Command::new(&self.exe)
            .arg(&html_path)
            .arg(staged.as_os_str())
            .arg("--stylesheet")
            .arg(&css_path)
            .arg("--encoding")
            .arg("utf-8")
            .output();

        let out = match result {
            Ok(out) => out,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RenderError::EngineNotFound(format!(
                    "{}: {}",
                    self.exe.display(),
                    e
                )))
            }
            Err(e) => return Err(RenderError::Io(e)),
        };

        if !out.status.success() {
            return Err(RenderError::EngineFailed {
                status: out.status.to_string(),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }

        if fs::metadata(&staged)?.len() == 0 {
            return Err(RenderError::EngineFailed {
                status: out.status.to_string(),
                stderr: "engine produced an empty file".to_string(),
            });
        }

        staged.persist(output).map_err(|e| RenderError::Io(e.error))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "weasyprint"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir_entries(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn missing_executable_is_engine_not_found() {
        let out_dir = tempfile::tempdir().unwrap();
        let renderer = WeasyPrintRenderer::new(out_dir.path().join("no-such-weasyprint"));
        let err = renderer
            .render("<html></html>", "", &out_dir.path().join("a.pdf"))
            .unwrap_err();
        assert!(matches!(err, RenderError::EngineNotFound(_)), "got {err:?}");
        assert!(err.is_systemic());
        assert!(dir_entries(out_dir.path()).is_empty(), "staged file left behind");
    }

    #[cfg(unix)]
    #[test]
    fn failing_engine_leaves_no_partial_output() {
        let out_dir = tempfile::tempdir().unwrap();
        let renderer = WeasyPrintRenderer::new("false");
        let err = renderer
            .render("<html></html>", "", &out_dir.path().join("a.pdf"))
            .unwrap_err();
        assert!(matches!(err, RenderError::EngineFailed { .. }), "got {err:?}");
        assert!(!err.is_systemic());
        assert!(dir_entries(out_dir.path()).is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn engine_writing_nothing_is_a_failure() {
        let out_dir = tempfile::tempdir().unwrap();
        let renderer = WeasyPrintRenderer::new("true");
        let err = renderer
            .render("<html></html>", "", &out_dir.path().join("a.pdf"))
            .unwrap_err();
        assert!(matches!(err, RenderError::EngineFailed { .. }), "got {err:?}");
        assert!(!out_dir.path().join("a.pdf").exists());
    }

    #[test]
    fn renderer_names() {
        assert_eq!(WeasyPrintRenderer::new("weasyprint").name(), "weasyprint");
        assert_eq!(
            WeasyPrintRenderer::new("/opt/wp").executable(),
            Path::new("/opt/wp")
        );
    }
}
