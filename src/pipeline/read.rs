//! Spreadsheet reading: open a workbook and pull sheets out as tables.
//!
//! `calamine` does the format work (xlsx, xlsm, xlsb, xls, ods are all
//! detected from the file); this module turns its cell grid into a
//! [`SheetTable`]: one header row plus data rows of display-ready values.
//!
//! A workbook handle is owned for the duration of one conversion call and
//! dropped (closing the file) before the next file is opened.

use crate::error::FileError;
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One cell, reduced to what is needed for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Date / time already formatted as `YYYY-MM-DD HH:MM:SS`.
    DateTime(String),
    /// Elapsed time formatted as `[h]:mm:ss`.
    Duration(String),
    /// Excel error code such as `#DIV/0!`.
    Error(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(i) => write!(f, "{i}"),
            // Whole numbers stored as floats print without a fraction.
            CellValue::Float(x) if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 => {
                write!(f, "{}", *x as i64)
            }
            CellValue::Float(x) => write!(f, "{x}"),
            CellValue::Bool(true) => f.write_str("TRUE"),
            CellValue::Bool(false) => f.write_str("FALSE"),
            CellValue::DateTime(s) | CellValue::Duration(s) | CellValue::Error(s) => {
                f.write_str(s)
            }
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(x) => CellValue::Float(*x),
            Data::Bool(b) => CellValue::Bool(*b),
            Data::DateTime(dt) if dt.is_duration() => {
                CellValue::Duration(format_duration_days(dt.as_f64()))
            }
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(ndt) => CellValue::DateTime(ndt.format("%Y-%m-%d %H:%M:%S").to_string()),
                None => CellValue::Float(dt.as_f64()),
            },
            Data::DateTimeIso(s) => CellValue::DateTime(s.replacen('T', " ", 1)),
            Data::DurationIso(s) => CellValue::Duration(s.clone()),
            Data::Error(e) => CellValue::Error(e.to_string()),
        }
    }
}

/// Format a fractional day count as `[h]:mm:ss`.
fn format_duration_days(days: f64) -> String {
    let total_secs = (days * 86_400.0).round() as i64;
    let sign = if total_secs < 0 { "-" } else { "" };
    let s = total_secs.abs();
    format!("{sign}{}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}

/// A sheet's data: header row plus data rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetTable {
    pub name: String,
    /// Column names from the first row; blank cells become `Unnamed: {i}`.
    pub headers: Vec<String>,
    /// Data rows, each padded to `headers.len()`. Trailing blank rows are
    /// dropped; blank rows between data rows are kept.
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    /// Build a table from a row-major grid whose first row is the header.
    pub fn from_grid(name: impl Into<String>, grid: Vec<Vec<CellValue>>) -> Self {
        let mut grid = grid.into_iter();
        let header_row = grid.next().unwrap_or_default();

        let mut rows: Vec<Vec<CellValue>> = grid.collect();
        while rows
            .last()
            .is_some_and(|row| row.iter().all(CellValue::is_empty))
        {
            rows.pop();
        }

        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header_row.len()))
            .max()
            .unwrap_or(0);

        let headers = (0..width)
            .map(|i| match header_row.get(i) {
                Some(cell) if !cell.is_empty() => cell.to_string(),
                _ => format!("Unnamed: {i}"),
            })
            .collect();

        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }

        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    fn from_range(name: &str, range: &Range<Data>) -> Self {
        let grid = range
            .rows()
            .map(|row| row.iter().map(CellValue::from).collect())
            .collect();
        Self::from_grid(name, grid)
    }

    /// `true` when the sheet has no data rows (a header alone is still empty).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// An open workbook.
pub struct Workbook {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl Workbook {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    /// Parse one sheet into a [`SheetTable`].
    pub fn read_sheet(&mut self, name: &str) -> Result<SheetTable, FileError> {
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|e| FileError::SheetReadFailed {
                sheet: name.to_string(),
                detail: e.to_string(),
            })?;
        let table = SheetTable::from_range(name, &range);
        debug!(
            "Read sheet '{}' from {}: {} columns, {} data rows",
            name,
            self.path.display(),
            table.headers.len(),
            table.rows.len()
        );
        Ok(table)
    }
}

/// Open a workbook, classifying failures for the batch report.
pub fn open_workbook(path: &Path) -> Result<Workbook, FileError> {
    match File::open(path) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(FileError::FileNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(FileError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(FileError::CorruptWorkbook {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })
        }
    }

    let sheets = open_workbook_auto(path).map_err(|e| FileError::CorruptWorkbook {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    Ok(Workbook {
        path: path.to_path_buf(),
        sheets,
    })
}
