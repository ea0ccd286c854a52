// 📂 Workbook Loader - named sheets as positional rows
// Two sources behind one trait: an .xlsx workbook (calamine) or a
// directory of per-sheet CSV exports (csv).

use calamine::{open_workbook, Data, ExcelDateTime, Range, Reader, Xlsx};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::temporal::{format_timestamp, parse_timestamp};

// ============================================================================
// ERRORS
// ============================================================================

/// File-level failures. Any of these aborts the whole run.
#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("cannot open workbook {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("cannot read sheet '{sheet}'")]
    Read {
        sheet: String,
        #[source]
        source: calamine::XlsxError,
    },

    #[error("CSV sheet directory {0} does not exist")]
    MissingDirectory(PathBuf),

    #[error("cannot read CSV sheet {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("sheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetMissing { sheet: String, available: Vec<String> },

    #[error("sheet '{sheet}' has {found} columns, expected {expected}")]
    LayoutMismatch {
        sheet: String,
        expected: usize,
        found: usize,
    },

    #[error("sheet '{sheet}' row {row} column {column}: {message}")]
    Cell {
        sheet: String,
        row: usize,
        column: usize,
        message: String,
    },
}

// ============================================================================
// CELL VALUES
// ============================================================================

/// A single typed cell, independent of the backing file format
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    /// Spreadsheet truthiness: empty, "", 0 and false count as absent.
    /// Non-empty text is present even when it reads "0".
    pub fn is_present(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Text(s) => !s.is_empty(),
            CellValue::Number(n) => *n != 0.0,
            CellValue::Bool(b) => *b,
            CellValue::DateTime(_) => true,
        }
    }

    /// String rendering of the value; `None` for empty cells
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) if s.is_empty() => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => Some(render_number(*n)),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::DateTime(dt) => Some(format_timestamp(dt)),
        }
    }

    /// Text of a present value; absent values (see `is_present`) give `None`
    pub fn present_text(&self) -> Option<String> {
        if self.is_present() {
            self.as_text()
        } else {
            None
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Empty | CellValue::DateTime(_) => None,
        }
    }

    /// Integer view. Numbers truncate toward zero; text must be an integer literal.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            CellValue::Text(s) => s.trim().parse::<i64>().ok(),
            CellValue::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            CellValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }
}

fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        (n as i64).to_string()
    } else {
        n.to_string()
    }
}

/// One data row of a sheet (header already removed)
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// 1-based row number in the source sheet, header included
    pub number: usize,
    pub cells: Vec<CellValue>,
}

impl Row {
    pub fn new(number: usize, cells: Vec<CellValue>) -> Self {
        Row { number, cells }
    }

    /// Cell at a 0-based column; out-of-range columns read as empty
    pub fn cell(&self, column: usize) -> &CellValue {
        self.cells.get(column).unwrap_or(&EMPTY_CELL)
    }
}

// ============================================================================
// SHEET SOURCE TRAIT
// ============================================================================

/// Expected shape of one sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub sheet: &'static str,
    pub width: usize,
    /// Columns that may hold timestamps when the source has no cell types
    pub timestamp_columns: &'static [usize],
}

impl SheetLayout {
    pub const fn new(sheet: &'static str, width: usize) -> Self {
        SheetLayout {
            sheet,
            width,
            timestamp_columns: &[],
        }
    }

    pub const fn with_timestamps(self, columns: &'static [usize]) -> Self {
        SheetLayout {
            timestamp_columns: columns,
            ..self
        }
    }
}

/// Anything that can hand out the data rows of a named sheet
pub trait SheetSource {
    /// Data rows of `layout.sheet`, header skipped, each exactly `layout.width` cells.
    /// A header with a different column count is a layout mismatch.
    fn rows(&mut self, layout: &SheetLayout) -> Result<Vec<Row>, WorkbookError>;

    /// Short label for logs
    fn describe(&self) -> String;
}

/// Pick a source for `path`: a directory means CSV exports, anything else an .xlsx file
pub fn open_source(path: &Path) -> Result<Box<dyn SheetSource>, WorkbookError> {
    if path.is_dir() {
        Ok(Box::new(CsvDirectory::open(path)?))
    } else {
        Ok(Box::new(XlsxWorkbook::open(path)?))
    }
}

// ============================================================================
// XLSX (calamine)
// ============================================================================

pub struct XlsxWorkbook {
    path: PathBuf,
    workbook: Xlsx<BufReader<File>>,
}

impl XlsxWorkbook {
    pub fn open(path: &Path) -> Result<Self, WorkbookError> {
        let workbook: Xlsx<_> = open_workbook(path).map_err(|source| WorkbookError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(XlsxWorkbook {
            path: path.to_path_buf(),
            workbook,
        })
    }
}

impl SheetSource for XlsxWorkbook {
    // xlsx cells carry their own types, so `timestamp_columns` is not consulted
    fn rows(&mut self, layout: &SheetLayout) -> Result<Vec<Row>, WorkbookError> {
        let sheet = layout.sheet;
        let available = self.workbook.sheet_names();
        if !available.iter().any(|name| name == sheet) {
            return Err(WorkbookError::SheetMissing {
                sheet: sheet.to_string(),
                available,
            });
        }

        let range = self
            .workbook
            .worksheet_range(sheet)
            .map_err(|source| WorkbookError::Read {
                sheet: sheet.to_string(),
                source,
            })?;

        range_to_rows(&range, sheet, layout.width)
    }

    fn describe(&self) -> String {
        format!("xlsx workbook {}", self.path.display())
    }
}

fn range_to_rows(range: &Range<Data>, sheet: &str, width: usize) -> Result<Vec<Row>, WorkbookError> {
    if range.is_empty() {
        return Ok(Vec::new());
    }

    if range.width() != width {
        return Err(WorkbookError::LayoutMismatch {
            sheet: sheet.to_string(),
            expected: width,
            found: range.width(),
        });
    }

    // Ranges start at the first used cell, not necessarily A1. The header is
    // the first row of the used range, which is sheet row 1 unless leading
    // rows are blank; row numbers stay sheet-absolute either way.
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut rows = Vec::with_capacity(range.height().saturating_sub(1));
    for (offset, raw) in range.rows().enumerate().skip(1) {
        let number = first_row + offset + 1;
        let cells = raw
            .iter()
            .enumerate()
            .map(|(column, data)| {
                cell_from_data(data).map_err(|message| WorkbookError::Cell {
                    sheet: sheet.to_string(),
                    row: number,
                    column: column + 1,
                    message,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(Row::new(number, cells));
    }

    Ok(rows)
}

/// Convert a calamine cell. Error cells (`#REF!`, `#N/A`, ...) are reported, not guessed.
fn cell_from_data(data: &Data) -> Result<CellValue, String> {
    let cell = match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => cell_from_excel_datetime(dt),
        Data::DateTimeIso(s) => match parse_timestamp(s) {
            Some(value) => CellValue::DateTime(value),
            None => CellValue::Text(s.clone()),
        },
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => return Err(format!("spreadsheet error value {e:?}")),
    };
    Ok(cell)
}

/// Only full date-times are structured. Time-of-day cells (serial below 1)
/// and durations keep their raw serial value.
fn cell_from_excel_datetime(dt: &ExcelDateTime) -> CellValue {
    let serial = dt.as_f64();
    if dt.is_duration() || serial < 1.0 {
        return CellValue::Number(serial);
    }
    match dt.as_datetime() {
        Some(value) => CellValue::DateTime(value),
        None => CellValue::Number(serial),
    }
}

// ============================================================================
// CSV DIRECTORY
// ============================================================================

/// A directory holding one `<Sheet>.csv` file per sheet, header row first
pub struct CsvDirectory {
    dir: PathBuf,
}

impl CsvDirectory {
    pub fn open(dir: &Path) -> Result<Self, WorkbookError> {
        if !dir.is_dir() {
            return Err(WorkbookError::MissingDirectory(dir.to_path_buf()));
        }
        Ok(CsvDirectory {
            dir: dir.to_path_buf(),
        })
    }

    fn sheet_path(&self, sheet: &str) -> PathBuf {
        self.dir.join(format!("{sheet}.csv"))
    }

    fn available_sheets(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.dir)
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.path())
                    .filter(|path| path.extension().is_some_and(|ext| ext == "csv"))
                    .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl SheetSource for CsvDirectory {
    fn rows(&mut self, layout: &SheetLayout) -> Result<Vec<Row>, WorkbookError> {
        let (sheet, width) = (layout.sheet, layout.width);
        let path = self.sheet_path(sheet);
        if !path.is_file() {
            return Err(WorkbookError::SheetMissing {
                sheet: sheet.to_string(),
                available: self.available_sheets(),
            });
        }

        let csv_error = |source: csv::Error| WorkbookError::Csv {
            path: path.clone(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_path(&path)
            .map_err(csv_error)?;

        let found = reader.headers().map_err(csv_error)?.len();
        if found != width {
            return Err(WorkbookError::LayoutMismatch {
                sheet: sheet.to_string(),
                expected: width,
                found,
            });
        }

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(csv_error)?;
            let cells = record
                .iter()
                .enumerate()
                .map(|(column, field)| {
                    cell_from_field(field, layout.timestamp_columns.contains(&column))
                })
                .collect();
            // Header is row 1
            rows.push(Row::new(index + 2, cells));
        }

        Ok(rows)
    }

    fn describe(&self) -> String {
        format!("CSV sheet directory {}", self.dir.display())
    }
}

/// CSV has no cell types: blank is empty and everything else is text, except
/// in declared timestamp columns where a parseable timestamp is structured
fn cell_from_field(field: &str, timestamp_column: bool) -> CellValue {
    if field.is_empty() {
        return CellValue::Empty;
    }
    if timestamp_column {
        if let Some(value) = parse_timestamp(field) {
            return CellValue::DateTime(value);
        }
    }
    CellValue::Text(field.to_string())
}

// ============================================================================
// TESTS
// ============================================================================
