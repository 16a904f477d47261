//! Exported tables and the run manifest

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, PoisonError};

use serde::ser::{Serialize, SerializeSeq, Serializer};

use super::schema::Schema;
use super::value::Value;

/// Name of the pseudo-table listing every exported table
pub const MANIFEST_NAME: &str = "fileList";

/// One converted sheet
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub name: String,
    pub schema: Schema,
    /// Converted data rows, one value per schema column
    pub rows: Vec<Vec<Value>>,
    /// Source text of every row rendered in the delimited-text form
    pub text_rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            rows: Vec::new(),
            text_rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, cells: Vec<Value>) {
        debug_assert_eq!(cells.len(), self.schema.len());
        self.rows.push(cells);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    /// Header row of field names
    pub fn header(&self) -> Vec<&str> {
        self.schema.names().collect()
    }
}

/// Serializes as an array of arrays: the header row, then each data row
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len() + 1))?;
        seq.serialize_element(&self.header())?;
        for row in &self.rows {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

/// Table names produced during a run.
///
/// Shared by the batch workers; inserts are serialized by a mutex.
#[derive(Debug, Default)]
pub struct Manifest {
    names: Mutex<BTreeSet<String>>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a table name, returning false if it was already present
    pub fn record(&self, name: impl Into<String>) -> bool {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into())
    }

    /// Names in lexicographic order
    pub fn into_sorted(self) -> Vec<String> {
        self.names
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .into_iter()
            .collect()
    }
}

/// The `{"fileList": [...]}` mapping written for a manifest
pub fn manifest_value(names: &[String]) -> Value {
    let list = Value::List(names.iter().cloned().map(Value::Str).collect());
    Value::Map(BTreeMap::from([(MANIFEST_NAME.to_string(), list)]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::schema::{Column, TypeTag};

    fn schema() -> Schema {
        Schema {
            columns: vec![
                Column {
                    name: "id".into(),
                    index: 0,
                    ty: TypeTag::Int,
                },
                Column {
                    name: "name".into(),
                    index: 1,
                    ty: TypeTag::String,
                },
            ],
        }
    }

    #[test]
    fn test_table_serializes_header_first() {
        let mut table = Table::new("item", schema());
        table.add_row(vec![Value::Int(1), Value::from("sword")]);
        table.add_row(vec![Value::Int(2), Value::from("shield")]);

        assert_eq!(table.row_count(), 2);
        assert_eq!(
            serde_json::to_string(&table).unwrap(),
            r#"[["id","name"],[1,"sword"],[2,"shield"]]"#
        );
    }

    #[test]
    fn test_manifest_sorted_and_deduplicated() {
        let manifest = Manifest::new();
        assert!(manifest.record("skill"));
        assert!(manifest.record("item"));
        assert!(!manifest.record("skill"));
        assert_eq!(manifest.into_sorted(), vec!["item", "skill"]);
    }

    #[test]
    fn test_manifest_concurrent_inserts() {
        let manifest = Manifest::new();
        std::thread::scope(|s| {
            for t in 0..8 {
                let manifest = &manifest;
                s.spawn(move || {
                    for i in 0..50 {
                        manifest.record(format!("t{}_{:02}", t, i));
                    }
                });
            }
        });
        assert_eq!(manifest.into_sorted().len(), 400);
    }

    #[test]
    fn test_manifest_value() {
        let value = manifest_value(&["a".to_string(), "b".to_string()]);
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"fileList":["a","b"]}"#
        );
    }
}
