//! Parallel export of a batch of workbooks

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::discover::discover_workbooks;
use crate::error::{ExportError, Result};
use crate::model::Manifest;
use crate::output::OutputWriter;
use crate::parser::{ExcelReader, SheetReader};
use crate::pipeline::{SheetOutcome, SheetPipeline};

/// Summary of a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Exported table names, sorted
    pub tables: Vec<String>,
    /// Workbooks with no exported columns
    pub empty: usize,
    /// Workbooks that could not be read
    pub unreadable: usize,
    /// Table names produced by more than one workbook
    pub duplicates: usize,
}

#[derive(Default)]
struct Tally {
    empty: AtomicUsize,
    unreadable: AtomicUsize,
    duplicates: AtomicUsize,
}

/// Runs one sheet pipeline per workbook and writes the manifest
pub struct BatchExporter {
    config: Config,
    reader: Box<dyn SheetReader>,
    writer: OutputWriter,
}

impl BatchExporter {
    /// Exporter reading workbooks with calamine
    pub fn new(config: Config) -> Self {
        Self::with_reader(config, Box::new(ExcelReader))
    }

    pub fn with_reader(config: Config, reader: Box<dyn SheetReader>) -> Self {
        let writer = OutputWriter::from_config(&config);
        Self {
            config,
            reader,
            writer,
        }
    }

    /// Discover workbooks under the configured root and export them
    pub fn export(&self) -> Result<BatchReport> {
        let files = discover_workbooks(&self.config.root)?;
        info!(root = %self.config.root.display(), files = files.len(), "discovered workbooks");
        self.run(&files)
    }

    /// Export `files` in parallel, then write the manifest.
    ///
    /// The manifest is written only when every workbook finished without a
    /// fatal error. With `fail_fast` no new workbook starts after the first
    /// fatal error; otherwise every workbook runs and all errors are
    /// reported together.
    pub fn run(&self, files: &[PathBuf]) -> Result<BatchReport> {
        let manifest = Manifest::new();
        let tally = Tally::default();
        let pipeline = SheetPipeline::new(&self.config, self.reader.as_ref(), &self.writer);

        let record = |outcome: SheetOutcome| match outcome {
            SheetOutcome::Exported(name) => {
                if !manifest.record(name.as_str()) {
                    warn!(table = %name, "table name exported by more than one workbook");
                    tally.duplicates.fetch_add(1, Ordering::Relaxed);
                }
            }
            SheetOutcome::Empty => {
                tally.empty.fetch_add(1, Ordering::Relaxed);
            }
            SheetOutcome::Unreadable => {
                tally.unreadable.fetch_add(1, Ordering::Relaxed);
            }
        };

        let mut errors: Vec<ExportError> = if self.config.fail_fast {
            files
                .par_iter()
                .try_for_each(|path| pipeline.run(path).map(&record))
                .err()
                .into_iter()
                .collect()
        } else {
            files
                .par_iter()
                .filter_map(|path| pipeline.run(path).map(&record).err())
                .collect()
        };

        if !errors.is_empty() {
            for e in &errors {
                error!("{}", e);
            }
            return Err(if errors.len() == 1 {
                errors.remove(0)
            } else {
                ExportError::Aborted(errors)
            });
        }

        let tables = manifest.into_sorted();
        self.writer.write_manifest(&tables)?;

        let report = BatchReport {
            tables,
            empty: tally.empty.into_inner(),
            unreadable: tally.unreadable.into_inner(),
            duplicates: tally.duplicates.into_inner(),
        };
        info!(
            tables = report.tables.len(),
            empty = report.empty,
            unreadable = report.unreadable,
            "export finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;

    use super::*;
    use crate::config::OutputFormat;
    use crate::error::ReadError;
    use crate::parser::RawSheet;

    /// Serves sheets from memory, keyed by file name
    struct MemoryReader {
        sheets: HashMap<String, RawSheet>,
    }

    impl MemoryReader {
        fn new(sheets: &[(&str, &[&[&str]])]) -> Self {
            let sheets = sheets
                .iter()
                .map(|(file, rows)| {
                    let rows = rows
                        .iter()
                        .map(|r| r.iter().map(|c| c.to_string()).collect())
                        .collect();
                    (file.to_string(), RawSheet::new("Sheet1", rows))
                })
                .collect();
            Self { sheets }
        }
    }

    impl SheetReader for MemoryReader {
        fn read(&self, path: &Path) -> Result<RawSheet, ReadError> {
            let file = path.file_name().and_then(|f| f.to_str()).unwrap_or_default();
            self.sheets.get(file).cloned().ok_or_else(|| ReadError::Open {
                path: path.to_path_buf(),
                message: "corrupt".into(),
            })
        }

        fn supports_extension(&self, ext: &str) -> bool {
            ext == "xlsx"
        }
    }

    const GOOD: &[&[&str]] = &[&["id", "v"], &["int", "auto"], &["1", "x"]];
    const BAD: &[&[&str]] = &[&["id"], &["int"], &["oops"]];

    fn exporter(dir: &Path, reader: MemoryReader, fail_fast: bool) -> BatchExporter {
        let json = dir.join("json");
        let lua = dir.join("lua");
        std::fs::create_dir_all(&json).unwrap();
        std::fs::create_dir_all(&lua).unwrap();
        let config = Config::default()
            .with_output(OutputFormat::Json, json)
            .with_output(OutputFormat::Lua, lua)
            .with_lines(1, 2, 0, 3)
            .with_sheet_name(false)
            .with_fail_fast(fail_fast);
        BatchExporter::with_reader(config, Box::new(reader))
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|n| PathBuf::from(format!("in/{}", n))).collect()
    }

    #[test]
    fn test_manifest_excludes_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let reader = MemoryReader::new(&[("c.xlsx", GOOD), ("a.xlsx", GOOD), ("b.xlsx", GOOD)]);
        let exporter = exporter(dir.path(), reader, true);

        let report = exporter
            .run(&paths(&["c.xlsx", "broken.xlsx", "a.xlsx", "b.xlsx"]))
            .unwrap();
        assert_eq!(report.tables, vec!["a", "b", "c"]);
        assert_eq!(report.unreadable, 1);

        let manifest = std::fs::read_to_string(dir.path().join("json/fileList.json")).unwrap();
        assert_eq!(manifest, r#"{"fileList":["a","b","c"]}"#);
        assert!(dir.path().join("lua/fileList.lua").exists());
        assert!(dir.path().join("json/a.json").exists());
    }

    #[test]
    fn test_conversion_error_aborts_without_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let reader = MemoryReader::new(&[("good.xlsx", GOOD), ("bad.xlsx", BAD)]);
        let exporter = exporter(dir.path(), reader, true);

        let err = exporter.run(&paths(&["good.xlsx", "bad.xlsx"])).unwrap_err();
        assert!(matches!(err, ExportError::Convert { .. }));
        assert!(!dir.path().join("json/fileList.json").exists());
    }

    #[test]
    fn test_drain_collects_every_error() {
        let dir = tempfile::tempdir().unwrap();
        let reader =
            MemoryReader::new(&[("bad1.xlsx", BAD), ("bad2.xlsx", BAD), ("ok.xlsx", GOOD)]);
        let exporter = exporter(dir.path(), reader, false);

        let err = exporter
            .run(&paths(&["bad1.xlsx", "ok.xlsx", "bad2.xlsx"]))
            .unwrap_err();
        assert_eq!(err.into_errors().len(), 2);
        // Finished workbooks keep their output
        assert!(dir.path().join("json/ok.json").exists());
        assert!(!dir.path().join("json/fileList.json").exists());
    }

    #[test]
    fn test_empty_schema_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let reader = MemoryReader::new(&[("blank.xlsx", &[&[], &[]]), ("ok.xlsx", GOOD)]);
        let exporter = exporter(dir.path(), reader, true);

        let report = exporter.run(&paths(&["blank.xlsx", "ok.xlsx"])).unwrap();
        assert_eq!(report.tables, vec!["ok"]);
        assert_eq!(report.empty, 1);
    }

    #[test]
    fn test_duplicate_names_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let reader = MemoryReader::new(&[("item.xlsx", GOOD)]);
        let exporter = exporter(dir.path(), reader, true);

        let files = vec![PathBuf::from("x/item.xlsx"), PathBuf::from("y/item.xlsx")];
        let report = exporter.run(&files).unwrap();
        assert_eq!(report.tables, vec!["item"]);
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn test_no_files_writes_empty_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path(), MemoryReader::new(&[]), true);

        let report = exporter.run(&[]).unwrap();
        assert!(report.tables.is_empty());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("json/fileList.json")).unwrap(),
            r#"{"fileList":[]}"#
        );
    }
}
