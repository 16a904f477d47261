//! xlsxport - export spreadsheet config tables
//!
//! Reads a directory of workbooks whose first rows declare field names,
//! column types and optional group tags, converts every data row into
//! typed values, and writes each table as delimited text, JSON, a Lua
//! table literal, MessagePack and a TypeScript interface.

pub mod batch;
pub mod config;
pub mod convert;
pub mod discover;
pub mod error;
pub mod logging;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;

pub use batch::{BatchExporter, BatchReport};
pub use config::Config;
pub use error::{ConvertError, ExportError};
pub use model::{Table, Value};
