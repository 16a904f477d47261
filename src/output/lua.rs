//! Lua table literal output format
//!
//! Output is `return <value>`. A composite opens with `{` and a newline,
//! every element sits on its own line indented by its depth and followed
//! by `,`, and the closing `}` is indented one level less. Map keys are
//! written in sorted order, as are `list,string` cells and the manifest, so
//! encoding the same table twice gives identical bytes. Every other list
//! keeps its source order.

use std::fmt::Write as _;

use anyhow::Result;

use crate::config::OutputFormat;
use crate::model::{manifest_value, Scalar, Table, TypeTag, Value};

use super::Encoder;

/// Lua output formatter
pub struct LuaOutput {
    escape_strings: bool,
}

impl LuaOutput {
    /// With `escape_strings` off, string contents are written verbatim
    pub fn new(escape_strings: bool) -> Self {
        Self { escape_strings }
    }
}

impl Default for LuaOutput {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Encoder for LuaOutput {
    fn format(&self) -> OutputFormat {
        OutputFormat::Lua
    }

    fn encode_table(&self, table: &Table) -> Result<Vec<u8>> {
        let mut w = LuaWriter::new(self.escape_strings);
        w.out.push_str("return {\n");

        // Header and row containers keep column order
        let header: Vec<Value> = table.header().into_iter().map(Value::from).collect();
        w.row(header.iter().map(|v| (v, false)));

        let sorted: Vec<bool> = table
            .schema
            .columns
            .iter()
            .map(|c| c.ty == TypeTag::List(Scalar::String))
            .collect();
        for row in &table.rows {
            w.row(row.iter().zip(sorted.iter().copied()));
        }

        w.out.push('}');
        Ok(w.out.into_bytes())
    }

    fn encode_manifest(&self, names: &[String]) -> Result<Option<Vec<u8>>> {
        let mut names = names.to_vec();
        names.sort();
        Ok(Some(self.encode_value(&manifest_value(&names)).into_bytes()))
    }
}

impl LuaOutput {
    /// Render `return <value>`
    pub fn encode_value(&self, value: &Value) -> String {
        let mut w = LuaWriter::new(self.escape_strings);
        w.out.push_str("return ");
        w.value(value, 0);
        w.out
    }
}

struct LuaWriter {
    out: String,
    escape: bool,
}

impl LuaWriter {
    fn new(escape: bool) -> Self {
        Self {
            out: String::new(),
            escape,
        }
    }

    /// One table row; cells flagged `true` are string lists written sorted
    fn row<'v>(&mut self, cells: impl IntoIterator<Item = (&'v Value, bool)>) {
        self.out.push_str("{\n");
        for (cell, sorted) in cells {
            self.indent(1);
            match cell {
                Value::List(items) if sorted => {
                    let mut items: Vec<&Value> = items.iter().collect();
                    items.sort_by(|a, b| a.as_str().cmp(&b.as_str()));
                    self.block(&items, 2);
                }
                _ => self.value(cell, 2),
            }
            self.out.push_str(",\n");
        }
        self.out.push_str("},\n");
    }

    fn value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Nil => self.out.push_str("nil"),
            Value::Bool(b) => {
                let _ = write!(self.out, "{}", b);
            }
            Value::Int(i) => {
                let _ = write!(self.out, "{}", i);
            }
            Value::Float32(f) => {
                let _ = write!(self.out, "{}", f);
            }
            Value::Float64(f) => {
                let _ = write!(self.out, "{}", f);
            }
            Value::Str(s) => self.string(s),
            Value::List(items) => {
                let items: Vec<&Value> = items.iter().collect();
                self.block(&items, depth);
            }
            Value::Map(map) => {
                self.out.push_str("{\n");
                for (key, item) in map {
                    self.indent(depth);
                    self.out.push('[');
                    self.string(key);
                    self.out.push_str("] = ");
                    self.value(item, depth + 1);
                    self.out.push_str(",\n");
                }
                self.indent(depth.saturating_sub(1));
                self.out.push('}');
            }
        }
    }

    fn block(&mut self, items: &[&Value], depth: usize) {
        self.out.push_str("{\n");
        for item in items {
            self.indent(depth);
            self.value(item, depth + 1);
            self.out.push_str(",\n");
        }
        self.indent(depth.saturating_sub(1));
        self.out.push('}');
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push('\t');
        }
    }

    fn string(&mut self, s: &str) {
        self.out.push('"');
        if self.escape {
            for c in s.chars() {
                match c {
                    '"' => self.out.push_str("\\\""),
                    '\\' => self.out.push_str("\\\\"),
                    '\n' => self.out.push_str("\\n"),
                    '\r' => self.out.push_str("\\r"),
                    '\t' => self.out.push_str("\\t"),
                    c if c.is_control() && (c as u32) < 0x80 => {
                        let _ = write!(self.out, "\\{:03}", c as u32);
                    }
                    c => self.out.push(c),
                }
            }
        } else {
            self.out.push_str(s);
        }
        self.out.push('"');
    }
}
