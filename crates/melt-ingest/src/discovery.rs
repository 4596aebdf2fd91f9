//! Input file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};
use crate::format::InputFormat;

/// Returns true if the path has a readable table extension.
pub fn is_supported_input(path: &Path) -> bool {
    InputFormat::from_path(path).is_some() && !is_lock_file(path)
}

/// Spreadsheet applications leave `~$name.xlsx` lock files next to open books.
fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("~$"))
}

/// Lists all supported table files in a directory.
///
/// Returns files sorted by filename.
pub fn list_input_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();

        // Skip directories
        if !path.is_file() {
            continue;
        }

        if is_supported_input(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Expands directories into their supported files, keeping the given order.
///
/// Explicit file paths are kept as given, even with an unsupported
/// extension, so the failure is reported against that file. A path given
/// twice is only kept once.
pub fn expand_inputs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut expanded: Vec<PathBuf> = Vec::new();
    for path in paths {
        let candidates = if path.is_dir() {
            list_input_files(path)?
        } else {
            vec![path.clone()]
        };
        for candidate in candidates {
            if expanded.contains(&candidate) {
                tracing::debug!(path = %candidate.display(), "skipping duplicate input");
                continue;
            }
            expanded.push(candidate);
        }
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        for name in &[
            "2024_内科.xlsx",
            "2023_summary.csv",
            "notes.txt",
            "~$2024_内科.xlsx",
            "legacy.XLS",
        ] {
            let path = dir.path().join(name);
            std::fs::write(&path, "header\ndata").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();

        dir
    }

    #[test]
    fn test_list_input_files() {
        let dir = create_test_dir();
        let files = list_input_files(dir.path()).unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["2023_summary.csv", "2024_内科.xlsx", "legacy.XLS"]);
    }

    #[test]
    fn test_list_input_files_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("test.csv");
        std::fs::write(&file_path, "data").unwrap();

        let result = list_input_files(&file_path);
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }

    #[test]
    fn test_expand_inputs_dedupes_and_keeps_order() {
        let dir = create_test_dir();
        let explicit = dir.path().join("legacy.XLS");
        let inputs = vec![explicit.clone(), dir.path().to_path_buf(), explicit.clone()];

        let expanded = expand_inputs(&inputs).unwrap();

        assert_eq!(expanded.len(), 3);
        assert_eq!(expanded[0], explicit);
        assert!(expanded[1].ends_with("2023_summary.csv"));
    }

    #[test]
    fn test_expand_inputs_keeps_unsupported_files() {
        let dir = create_test_dir();
        let notes = dir.path().join("notes.txt");

        let expanded = expand_inputs(std::slice::from_ref(&notes)).unwrap();

        assert_eq!(expanded, vec![notes]);
    }
}
