//! TypeScript interface declarations

use anyhow::Result;

use crate::config::OutputFormat;
use crate::model::Table;

use super::Encoder;

/// Emits `export interface I<table>` with one field per exported column
pub struct TsOutput;

impl TsOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TsOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for TsOutput {
    fn format(&self) -> OutputFormat {
        OutputFormat::Ts
    }

    fn encode_table(&self, table: &Table) -> Result<Vec<u8>> {
        let mut out = format!("export interface I{} {{", table.name);
        for column in &table.schema.columns {
            out.push_str(&format!("\n\t{}: {},", column.name, column.ty.ts_type()));
        }
        out.push_str("\n}");
        Ok(out.into_bytes())
    }

    fn encode_manifest(&self, _names: &[String]) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
}
