//! Configuration handling for xlsxport

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ExportError, Result};

/// Output format for exported tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutputFormat {
    Txt,
    Json,
    Lua,
    Bin,
    Ts,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Txt,
        OutputFormat::Json,
        OutputFormat::Lua,
        OutputFormat::Bin,
        OutputFormat::Ts,
    ];

    /// File extension written for this format
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Lua => "lua",
            OutputFormat::Bin => "bin",
            OutputFormat::Ts => "ts",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" => Ok(OutputFormat::Txt),
            "json" => Ok(OutputFormat::Json),
            "lua" => Ok(OutputFormat::Lua),
            "bin" => Ok(OutputFormat::Bin),
            "ts" => Ok(OutputFormat::Ts),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Which columns appear in the delimited-text rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxtColumns {
    /// Every named column, ignoring the group filter
    #[default]
    All,
    /// Only the exported schema columns
    Schema,
}

/// 0-based header row positions inside a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    pub field_row: usize,
    pub type_row: usize,
    pub group_row: Option<usize>,
    pub data_row: usize,
}

/// Configuration for an export run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for workbooks
    #[serde(alias = "Root")]
    pub root: PathBuf,
    /// Delimited-text output directory
    #[serde(alias = "Txt")]
    pub txt: PathBuf,
    /// JSON output directory
    #[serde(alias = "JSON", alias = "Json")]
    pub json: PathBuf,
    /// Lua output directory
    #[serde(alias = "Lua")]
    pub lua: PathBuf,
    /// MessagePack output directory
    #[serde(alias = "Bin")]
    pub bin: PathBuf,
    /// TypeScript interface output directory
    #[serde(alias = "TSInterface", alias = "TsInterface")]
    pub ts: PathBuf,
    /// Active groups; empty exports every column
    #[serde(alias = "Group")]
    pub groups: Vec<String>,
    /// 1-based row holding field names
    #[serde(alias = "FieldLine")]
    pub field_line: usize,
    /// 1-based row holding column types
    #[serde(alias = "TypeLine")]
    pub type_line: usize,
    /// 1-based row holding group tags, 0 when absent
    #[serde(alias = "GroupLine")]
    pub group_line: usize,
    /// 1-based first data row
    #[serde(alias = "DataLine")]
    pub data_line: usize,
    /// Compress every non-TypeScript output with zlib
    #[serde(alias = "UseZlib")]
    pub use_zlib: bool,
    /// Field separator for the text format
    #[serde(alias = "Comma")]
    pub separator: String,
    /// Line terminator for the text format
    #[serde(alias = "Linefeed")]
    pub line_terminator: String,
    /// Rows whose first cell starts with this marker are skipped
    #[serde(alias = "Comment")]
    pub comment: String,
    /// Name tables after the sheet instead of the file
    #[serde(alias = "UseSheetName")]
    pub use_sheet_name: bool,
    pub escape_lua_strings: bool,
    pub txt_header_rows: bool,
    pub txt_columns: TxtColumns,
    pub fail_fast: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            txt: PathBuf::new(),
            json: PathBuf::new(),
            lua: PathBuf::new(),
            bin: PathBuf::new(),
            ts: PathBuf::new(),
            groups: Vec::new(),
            field_line: 1,
            type_line: 2,
            group_line: 0,
            data_line: 3,
            use_zlib: false,
            separator: "\t".to_string(),
            line_terminator: "\n".to_string(),
            comment: "#".to_string(),
            use_sheet_name: true,
            escape_lua_strings: true,
            txt_header_rows: true,
            txt_columns: TxtColumns::default(),
            fail_fast: true,
        }
    }
}

impl Config {
    /// Load a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|source| ExportError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&data).map_err(|source| ExportError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse config from a JSON string
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }

    /// Check row numbers and output settings
    pub fn validate(&self) -> Result<()> {
        if self.field_line == 0 || self.type_line == 0 || self.data_line == 0 {
            return Err(ExportError::Config(
                "field_line, type_line and data_line are 1-based and must be set".into(),
            ));
        }
        if !self.groups.is_empty() && self.group_line == 0 {
            return Err(ExportError::Config(
                "groups are configured but group_line is not set".into(),
            ));
        }
        if self.enabled_outputs().next().is_none() {
            return Err(ExportError::Config("no output directory configured".into()));
        }
        Ok(())
    }

    /// Header row positions converted to 0-based indices
    pub fn layout(&self) -> SheetLayout {
        SheetLayout {
            field_row: self.field_line.saturating_sub(1),
            type_row: self.type_line.saturating_sub(1),
            group_row: self.group_line.checked_sub(1),
            data_row: self.data_line.saturating_sub(1),
        }
    }

    /// Output directory for a format; empty means disabled
    pub fn output_dir(&self, format: OutputFormat) -> &Path {
        match format {
            OutputFormat::Txt => &self.txt,
            OutputFormat::Json => &self.json,
            OutputFormat::Lua => &self.lua,
            OutputFormat::Bin => &self.bin,
            OutputFormat::Ts => &self.ts,
        }
    }

    /// Formats with a non-empty output directory
    pub fn enabled_outputs(&self) -> impl Iterator<Item = (OutputFormat, &Path)> {
        OutputFormat::ALL
            .into_iter()
            .filter(move |f| self.is_enabled(*f))
            .map(move |f| (f, self.output_dir(f)))
    }

    pub fn is_enabled(&self, format: OutputFormat) -> bool {
        !self.output_dir(format).as_os_str().is_empty()
    }

    /// Set the input root
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the output directory for a format
    pub fn with_output(mut self, format: OutputFormat, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        match format {
            OutputFormat::Txt => self.txt = dir,
            OutputFormat::Json => self.json = dir,
            OutputFormat::Lua => self.lua = dir,
            OutputFormat::Bin => self.bin = dir,
            OutputFormat::Ts => self.ts = dir,
        }
        self
    }

    /// Set 1-based header rows
    pub fn with_lines(mut self, field: usize, ty: usize, group: usize, data: usize) -> Self {
        self.field_line = field;
        self.type_line = ty;
        self.group_line = group;
        self.data_line = data;
        self
    }

    /// Set the active groups
    pub fn with_groups<S: Into<String>>(mut self, groups: impl IntoIterator<Item = S>) -> Self {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_zlib(mut self, use_zlib: bool) -> Self {
        self.use_zlib = use_zlib;
        self
    }

    pub fn with_sheet_name(mut self, use_sheet_name: bool) -> Self {
        self.use_sheet_name = use_sheet_name;
        self
    }

    pub fn with_txt_columns(mut self, columns: TxtColumns) -> Self {
        self.txt_columns = columns;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}
