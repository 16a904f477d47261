//! JSON output format

use anyhow::Result;

use crate::config::OutputFormat;
use crate::model::{manifest_value, Table};

use super::Encoder;

/// Compact JSON output formatter
pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for JsonOutput {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn encode_table(&self, table: &Table) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(table)?)
    }

    fn encode_manifest(&self, names: &[String]) -> Result<Option<Vec<u8>>> {
        Ok(Some(serde_json::to_vec(&manifest_value(names))?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert;
    use crate::model::{Column, Schema, TypeTag};

    fn float_table(raw: &[&str]) -> Table {
        let schema = Schema {
            columns: vec![Column {
                name: "rate".into(),
                index: 0,
                ty: TypeTag::Float,
            }],
        };
        let mut table = Table::new("rates", schema);
        for r in raw {
            table.add_row(vec![convert(TypeTag::Float, r).unwrap()]);
        }
        table
    }

    #[test]
    fn test_float_digits_preserved() {
        let out = JsonOutput::new()
            .encode_table(&float_table(&["3.14", "3.14159265", "0.1"]))
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"[["rate"],[3.14],[3.14159265],[0.1]]"#
        );
    }

    #[test]
    fn test_manifest() {
        let out = JsonOutput::new()
            .encode_manifest(&["hero".to_string(), "item".to_string()])
            .unwrap()
            .unwrap();
        assert_eq!(out, br#"{"fileList":["hero","item"]}"#);
    }
}
