//! MessagePack output format

use anyhow::{Context, Result};

use crate::config::OutputFormat;
use crate::model::{manifest_value, Table};

use super::Encoder;

/// MessagePack formatter.
///
/// Same structure as the JSON output; integers use their smallest
/// encoding and 32-bit floats stay 32-bit.
pub struct BinOutput;

impl BinOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BinOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Encoder for BinOutput {
    fn format(&self) -> OutputFormat {
        OutputFormat::Bin
    }

    fn encode_table(&self, table: &Table) -> Result<Vec<u8>> {
        rmp_serde::to_vec(table).context("msgpack encoding failed")
    }

    fn encode_manifest(&self, names: &[String]) -> Result<Option<Vec<u8>>> {
        rmp_serde::to_vec(&manifest_value(names))
            .context("msgpack encoding failed")
            .map(Some)
    }
}
