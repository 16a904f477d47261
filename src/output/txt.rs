//! Delimited text output format

use anyhow::Result;

use crate::config::OutputFormat;
use crate::model::Table;

use super::Encoder;

/// Delimited text formatter.
///
/// Writes the source text of each rendered row, not converted values.
pub struct TxtOutput {
    separator: String,
    line_terminator: String,
}

impl TxtOutput {
    pub fn new(separator: impl Into<String>, line_terminator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
            line_terminator: line_terminator.into(),
        }
    }
}

impl Default for TxtOutput {
    fn default() -> Self {
        Self::new("\t", "\n")
    }
}

impl Encoder for TxtOutput {
    fn format(&self) -> OutputFormat {
        OutputFormat::Txt
    }

    fn encode_table(&self, table: &Table) -> Result<Vec<u8>> {
        let text = table
            .text_rows
            .iter()
            .map(|row| row.join(&self.separator))
            .collect::<Vec<_>>()
            .join(&self.line_terminator);
        Ok(text.into_bytes())
    }

    fn encode_manifest(&self, names: &[String]) -> Result<Option<Vec<u8>>> {
        Ok(Some(names.join(&self.line_terminator).into_bytes()))
    }
}
