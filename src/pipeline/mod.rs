//! Pipeline stages for spreadsheet-to-PDF conversion.
//!
//! Each submodule implements one step; the driver in [`crate::convert`]
//! strings them together per file.
//!
//! ## Data Flow
//!
//! ```text
//! discover ──▶ read ──▶ html ──▶ pdf
//! (walkdir)   (calamine) (table)  (weasyprint)
//!                 │
//!                 └──▶ naming (output paths)
//! ```
//!
//! 1. [`discover`] walks the input directory and yields matching files
//! 2. [`read`] opens a workbook and turns each sheet into a [`read::SheetTable`]
//! 3. [`naming`] decides the PDF path for every sheet before anything renders
//! 4. [`html`] builds the escaped table markup and document shell
//! 5. [`pdf`] hands HTML + CSS to the rendering engine and writes the file

pub mod discover;
pub mod html;
pub mod naming;
pub mod pdf;
pub mod read;
