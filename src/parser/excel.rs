//! Excel workbook reader (xlsx, xlsm, xls, ods)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use crate::error::ReadError;

use super::{trim_rows, RawSheet, SheetReader};

/// Reader for Excel files
pub struct ExcelReader;

impl SheetReader for ExcelReader {
    fn read(&self, path: &Path) -> Result<RawSheet, ReadError> {
        let mut workbook = open_workbook_auto(path).map_err(|e| ReadError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ReadError::NoSheets(path.to_path_buf()))?;

        let range: Range<Data> =
            workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| ReadError::Sheet {
                    path: path.to_path_buf(),
                    sheet: sheet_name.clone(),
                    message: e.to_string(),
                })?;

        Ok(RawSheet::new(sheet_name, range_to_rows(&range)))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "xlsx" | "xls" | "ods" | "xlsm")
    }
}

/// Render a range as text rows anchored at A1
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
    rows.extend(range.rows().map(|row| {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_to_string));
        cells
    }));
    trim_rows(&mut rows);
    rows
}

/// Text of a cell as it reads in the sheet
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => {
            // Whole numbers read back without a fraction
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format!("{}", dt),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#{:?}", e),
    }
}
