//! Test file loading and discovery.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, SqlTestError};
use crate::model::TestFileDefinition;

/// Extension of test files picked up from directories.
pub const TEST_FILE_EXTENSION: &str = "json";

/// Parses a test definition. `path` is used in error messages only.
pub fn parse_test_file(text: &str, path: &Path) -> Result<TestFileDefinition> {
    serde_json::from_str(text).map_err(|e| SqlTestError::TestFileParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Reads and parses the test file at `path`.
pub fn load_test_file(path: &Path) -> Result<TestFileDefinition> {
    let text = fs::read_to_string(path).map_err(|e| SqlTestError::TestFileRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let file = parse_test_file(&text, path)?;
    let count = file.tests.len();
    tracing::debug!("Loaded {} test(s) from {}", count, path.display());
    Ok(file)
}

/// Expands `inputs` into the list of test files to run.
///
/// Files are taken as given. Directories are searched recursively for
/// `*.json` files, sorted by path. Each file appears once, at its first
/// position.
pub fn discover_test_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry.map_err(|e| SqlTestError::TestFileRead {
                    path: input.clone(),
                    message: e.to_string(),
                })?;
                if entry.file_type().is_file() && has_test_extension(entry.path()) {
                    found.push(entry.into_path());
                }
            }
            if found.is_empty() {
                tracing::warn!("No test files found in {}", input.display());
            }
            for path in found {
                if seen.insert(path.clone()) {
                    files.push(path);
                }
            }
        } else if input.is_file() {
            if seen.insert(input.clone()) {
                files.push(input.clone());
            }
        } else {
            return Err(SqlTestError::TestFileRead {
                path: input.clone(),
                message: "no such file or directory".to_string(),
            });
        }
    }

    Ok(files)
}

fn has_test_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TEST_FILE_EXTENSION))
}
