//! Output encoders and the file writer that drives them

mod bin;
mod compress;
mod json;
mod lua;
mod ts;
mod txt;

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use crate::config::{Config, OutputFormat};
use crate::error::ExportError;
use crate::model::{Table, MANIFEST_NAME};

pub use bin::BinOutput;
pub use compress::compress;
pub use json::JsonOutput;
pub use lua::LuaOutput;
pub use ts::TsOutput;
pub use txt::TxtOutput;

/// Trait for table encoders
pub trait Encoder: Send + Sync {
    fn format(&self) -> OutputFormat;

    /// Encode one table
    fn encode_table(&self, table: &Table) -> Result<Vec<u8>>;

    /// Encode the sorted manifest, `None` when the format has no manifest
    fn encode_manifest(&self, names: &[String]) -> Result<Option<Vec<u8>>>;
}

/// Factory for creating encoders
pub struct OutputFactory;

impl OutputFactory {
    /// Create an encoder for a format, configured from `config`
    pub fn create(format: OutputFormat, config: &Config) -> Box<dyn Encoder> {
        match format {
            OutputFormat::Txt => Box::new(TxtOutput::new(
                config.separator.clone(),
                config.line_terminator.clone(),
            )),
            OutputFormat::Json => Box::new(JsonOutput::new()),
            OutputFormat::Lua => Box::new(LuaOutput::new(config.escape_lua_strings)),
            OutputFormat::Bin => Box::new(BinOutput::new()),
            OutputFormat::Ts => Box::new(TsOutput::new()),
        }
    }
}

struct Target {
    dir: PathBuf,
    encoder: Box<dyn Encoder>,
}

/// Writes tables to every enabled output directory
pub struct OutputWriter {
    targets: Vec<Target>,
    compress: bool,
}

impl OutputWriter {
    /// One target per format with a non-empty output directory
    pub fn from_config(config: &Config) -> Self {
        let targets = config
            .enabled_outputs()
            .map(|(format, dir)| Target {
                dir: dir.to_path_buf(),
                encoder: OutputFactory::create(format, config),
            })
            .collect();
        Self {
            targets,
            compress: config.use_zlib,
        }
    }

    /// Encode and write a table in every enabled format
    pub fn write_table(&self, table: &Table) -> Result<Vec<PathBuf>, ExportError> {
        let mut written = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            let bytes = target
                .encoder
                .encode_table(table)
                .map_err(|e| encode_error(&table.name, target.encoder.format(), e))?;
            written.push(self.write(target, &table.name, bytes)?);
        }
        Ok(written)
    }

    /// Write the `fileList` manifest to every format that has one
    pub fn write_manifest(&self, names: &[String]) -> Result<Vec<PathBuf>, ExportError> {
        let mut written = Vec::new();
        for target in &self.targets {
            let bytes = target
                .encoder
                .encode_manifest(names)
                .map_err(|e| encode_error(MANIFEST_NAME, target.encoder.format(), e))?;
            if let Some(bytes) = bytes {
                written.push(self.write(target, MANIFEST_NAME, bytes)?);
            }
        }
        Ok(written)
    }

    fn write(&self, target: &Target, name: &str, bytes: Vec<u8>) -> Result<PathBuf, ExportError> {
        let format = target.encoder.format();
        let path = output_path(&target.dir, name, format);

        // TypeScript declarations are source code and stay plain text
        let bytes = if self.compress && format != OutputFormat::Ts {
            compress(&bytes).map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?
        } else {
            bytes
        };

        std::fs::write(&path, &bytes).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "wrote output");
        Ok(path)
    }
}

/// `<dir>/<name>.<ext>`
pub fn output_path(dir: &Path, name: &str, format: OutputFormat) -> PathBuf {
    dir.join(format!("{}.{}", name, format.extension()))
}

fn encode_error(table: &str, format: OutputFormat, e: anyhow::Error) -> ExportError {
    ExportError::Encode {
        table: table.to_string(),
        format: format.extension(),
        message: format!("{:#}", e),
    }
}
