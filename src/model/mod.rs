//! Data model for exported tables

mod schema;
mod table;
mod value;

pub use schema::{in_groups, select_columns, Column, Scalar, Schema, TypeTag};
pub use table::{manifest_value, Manifest, Table, MANIFEST_NAME};
pub use value::Value;
