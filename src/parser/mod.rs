//! Reading raw sheets out of workbook files

mod excel;

use std::path::Path;

use crate::error::ReadError;

pub use self::excel::ExcelReader;

/// A worksheet as rows of cell text.
///
/// Indices are absolute: `rows[0][0]` is cell A1. Trailing empty cells
/// are trimmed, so a blank row is an empty vector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Row by 0-based index, empty when out of range
    pub fn row(&self, index: usize) -> &[String] {
        self.rows.get(index).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Cell text of a row, empty when out of range
pub fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}

/// Trait for reading the exported sheet of a workbook
pub trait SheetReader: Send + Sync {
    /// Read the first worksheet of a file
    fn read(&self, path: &Path) -> Result<RawSheet, ReadError>;

    /// Check if this reader can handle the given file extension
    fn supports_extension(&self, ext: &str) -> bool;
}

/// Drop trailing empty cells from every row
pub(crate) fn trim_rows(rows: &mut [Vec<String>]) {
    for row in rows {
        while row.last().is_some_and(|c| c.is_empty()) {
            row.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_out_of_range_is_empty() {
        let sheet = RawSheet::new("s", vec![vec!["a".into()]]);
        assert_eq!(cell(sheet.row(0), 0), "a");
        assert_eq!(cell(sheet.row(0), 3), "");
        assert_eq!(cell(sheet.row(9), 0), "");
        assert!(sheet.row(9).is_empty());
    }

    #[test]
    fn test_trim_rows() {
        let mut rows = vec![
            vec!["a".to_string(), String::new(), "b".into(), String::new()],
            vec![String::new(), String::new()],
        ];
        trim_rows(&mut rows);
        assert_eq!(rows[0].len(), 3);
        assert!(rows[1].is_empty());
    }
}
