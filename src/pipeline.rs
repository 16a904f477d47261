//! Per-workbook export: read, extract schema, convert rows, encode

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::{Config, SheetLayout, TxtColumns};
use crate::convert::convert;
use crate::error::{ExportError, ReadError, Result};
use crate::model::{select_columns, Schema, Table};
use crate::output::OutputWriter;
use crate::parser::{cell, RawSheet, SheetReader};

/// How a single workbook ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetOutcome {
    /// Written under this table name
    Exported(String),
    /// No exported columns remain after filtering
    Empty,
    /// The workbook could not be read
    Unreadable,
}

/// Builds a [`Table`] from a raw sheet
pub struct TableBuilder<'a> {
    config: &'a Config,
    layout: SheetLayout,
}

impl<'a> TableBuilder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            layout: config.layout(),
        }
    }

    /// Extract the schema and convert every data row.
    ///
    /// Returns `Ok(None)` when no column survives filtering. Rows that are
    /// blank, commented out or missing a primary key are skipped; a cell
    /// that does not match its column type is an error.
    pub fn build(&self, sheet: &RawSheet, name: &str) -> Result<Option<Table>> {
        let layout = self.layout;
        let group_row = layout.group_row.map(|r| sheet.row(r));

        let selected = select_columns(sheet.row(layout.field_row), group_row, &self.config.groups);
        if selected.is_empty() {
            return Ok(None);
        }

        let schema = Schema::with_types(selected, sheet.row(layout.type_row)).map_err(
            |(column, source)| ExportError::Convert {
                table: name.to_string(),
                row: layout.type_row + 1,
                column: column + 1,
                source,
            },
        )?;
        let Some(key) = schema.primary_key() else {
            return Ok(None);
        };

        let text_columns: Vec<usize> = match self.config.txt_columns {
            TxtColumns::Schema => schema.columns.iter().map(|c| c.index).collect(),
            TxtColumns::All => select_columns(sheet.row(layout.field_row), None, &[])
                .into_iter()
                .map(|(index, _)| index)
                .collect(),
        };

        let mut table = Table::new(name, schema);
        for (n, row) in sheet.rows.iter().enumerate() {
            if row.is_empty() {
                continue;
            }
            if !self.config.comment.is_empty() && cell(row, 0).starts_with(&self.config.comment) {
                continue;
            }
            let is_data = n >= layout.data_row;
            if cell(row, key).is_empty() {
                if is_data {
                    warn!(
                        table = name,
                        row = n + 1,
                        column = key + 1,
                        "primary key is empty, row skipped"
                    );
                }
                continue;
            }

            if self.keeps_text_row(n) {
                table.text_rows.push(
                    text_columns
                        .iter()
                        .map(|&i| cell(row, i).to_string())
                        .collect(),
                );
            }
            if !is_data {
                continue;
            }

            let cells = table
                .schema
                .columns
                .iter()
                .map(|column| {
                    convert(column.ty, cell(row, column.index)).map_err(|source| {
                        ExportError::Convert {
                            table: name.to_string(),
                            row: n + 1,
                            column: column.index + 1,
                            source,
                        }
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            table.add_row(cells);
        }

        Ok(Some(table))
    }

    fn keeps_text_row(&self, n: usize) -> bool {
        if Some(n) == self.layout.group_row {
            return false;
        }
        n >= self.layout.data_row || self.config.txt_header_rows
    }
}

/// Runs one workbook through every stage and writes its outputs
pub struct SheetPipeline<'a> {
    config: &'a Config,
    reader: &'a dyn SheetReader,
    writer: &'a OutputWriter,
}

impl<'a> SheetPipeline<'a> {
    pub fn new(config: &'a Config, reader: &'a dyn SheetReader, writer: &'a OutputWriter) -> Self {
        Self {
            config,
            reader,
            writer,
        }
    }

    /// Export one workbook.
    ///
    /// Read failures and empty schemas end in an `Ok` outcome; conversion
    /// and write failures are returned as errors.
    pub fn run(&self, path: &Path) -> Result<SheetOutcome> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let read = if self.reader.supports_extension(ext) {
            self.reader.read(path)
        } else {
            Err(ReadError::Unsupported(path.to_path_buf()))
        };
        let sheet = match read {
            Ok(sheet) => sheet,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable workbook");
                return Ok(SheetOutcome::Unreadable);
            }
        };
        debug!(file = %path.display(), sheet = %sheet.name, rows = sheet.rows.len(), "opened");

        let name = table_name(self.config, path, &sheet);
        let Some(table) = TableBuilder::new(self.config).build(&sheet, &name)? else {
            debug!(file = %path.display(), "no exported columns");
            return Ok(SheetOutcome::Empty);
        };
        debug!(
            table = %name,
            rows = table.row_count(),
            columns = table.column_count(),
            "converted"
        );

        self.writer.write_table(&table)?;
        info!(table = %name, rows = table.row_count(), "exported");
        Ok(SheetOutcome::Exported(name))
    }
}

/// Sheet name or file stem, depending on `use_sheet_name`
pub fn table_name(config: &Config, path: &Path, sheet: &RawSheet) -> String {
    if config.use_sheet_name {
        sheet.name.clone()
    } else {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| sheet.name.clone())
    }
}
