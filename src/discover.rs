//! Locating workbooks under the input root

use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::error::{ExportError, Result};

/// Excel lock files left open by the editor
const LOCK_PREFIX: &str = "~$";
/// Workbooks excluded by hand
const EXCLUDE_PREFIX: &str = "#";

/// Whether a file name is an exportable workbook
pub fn is_workbook(file_name: &str) -> bool {
    file_name.ends_with(".xlsx")
        && !file_name.starts_with(LOCK_PREFIX)
        && !file_name.starts_with(EXCLUDE_PREFIX)
}

/// Recursively collect workbooks under `root`, sorted by path
pub fn discover_workbooks(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(ExportError::Discover {
            path: root.to_path_buf(),
            message: "not a directory".into(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && entry.file_name().to_str().is_some_and(is_workbook) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_is_workbook() {
        assert!(is_workbook("item.xlsx"));
        assert!(!is_workbook("~$item.xlsx"));
        assert!(!is_workbook("#draft.xlsx"));
        assert!(!is_workbook("item.xls"));
        assert!(!is_workbook("item.xlsx.bak"));
    }

    #[test]
    fn test_discover_recursive_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub/deeper")).unwrap();
        for name in [
            "b.xlsx",
            "a.xlsx",
            "~$a.xlsx",
            "#skip.xlsx",
            "notes.txt",
            "sub/c.xlsx",
            "sub/deeper/d.xlsx",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }

        let files = discover_workbooks(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.xlsx"),
                PathBuf::from("b.xlsx"),
                PathBuf::from("sub/c.xlsx"),
                PathBuf::from("sub/deeper/d.xlsx"),
            ]
        );
    }

    #[test]
    fn test_missing_root() {
        let err = discover_workbooks(Path::new("/nonexistent/root")).unwrap_err();
        assert!(matches!(err, ExportError::Discover { .. }));
    }
}
