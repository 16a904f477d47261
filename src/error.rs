//! Error types for the export pipeline

use std::path::PathBuf;

use thiserror::Error;

/// A cell that cannot satisfy its declared column type
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConvertError {
    #[error("unknown column type '{0}'")]
    UnknownType(String),

    #[error("'{0}' is not a valid int")]
    InvalidInt(String),

    #[error("'{0}' is not a valid float")]
    InvalidFloat(String),

    #[error("'{value}' is not a valid {tag}: {reason}")]
    InvalidList {
        tag: String,
        value: String,
        reason: String,
    },
}

/// A workbook that could not be opened or read.
///
/// Only ever affects the file it came from.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to open workbook {path}: {message}")]
    Open { path: PathBuf, message: String },

    #[error("workbook {0} has no sheets")]
    NoSheets(PathBuf),

    #[error("failed to read sheet '{sheet}' in {path}: {message}")]
    Sheet {
        path: PathBuf,
        sheet: String,
        message: String,
    },

    #[error("unsupported file format: {0}")]
    Unsupported(PathBuf),
}

/// Errors that abort a whole export run
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to scan {path}: {message}")]
    Discover { path: PathBuf, message: String },

    #[error("{table} (row={row},col={column}) error: {source}")]
    Convert {
        table: String,
        row: usize,
        column: usize,
        #[source]
        source: ConvertError,
    },

    #[error("failed to encode {table} as {format}: {message}")]
    Encode {
        table: String,
        format: &'static str,
        message: String,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("export aborted with {} error(s): {}", .0.len(), join_errors(.0))]
    Aborted(Vec<ExportError>),
}

impl ExportError {
    /// Flatten nested aborts into a single list of root errors
    pub fn into_errors(self) -> Vec<ExportError> {
        match self {
            ExportError::Aborted(errors) => errors
                .into_iter()
                .flat_map(ExportError::into_errors)
                .collect(),
            other => vec![other],
        }
    }
}

fn join_errors(errors: &[ExportError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T, E = ExportError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_error_message_includes_position() {
        let err = ExportError::Convert {
            table: "item".into(),
            row: 5,
            column: 2,
            source: ConvertError::InvalidInt("abc".into()),
        };
        assert_eq!(
            err.to_string(),
            "item (row=5,col=2) error: 'abc' is not a valid int"
        );
    }

    #[test]
    fn test_aborted_flattens() {
        let err = ExportError::Aborted(vec![
            ExportError::Config("a".into()),
            ExportError::Aborted(vec![ExportError::Config("b".into())]),
        ]);
        let errors = err.into_errors();
        assert_eq!(errors.len(), 2);
        assert!(errors[1].to_string().contains('b'));
    }
}
