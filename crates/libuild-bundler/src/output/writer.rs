//! File writing for build output.
//!
//! Every file name is validated against the output directory before anything
//! touches disk, and all files of one target are staged in temporary files
//! and renamed into place together. A failed write leaves no partial files
//! from that target behind; files from other targets are unaffected.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use path_clean::PathClean;
use tempfile::NamedTempFile;

use crate::{Error, Result};

/// One file to write, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl OutputFile {
    pub fn new(file_name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }
}

/// Write `files` under `dir`, replacing existing files.
///
/// Returns the written file names in input order.
pub fn write_outputs(files: &[OutputFile], dir: &Path) -> Result<Vec<String>> {
    let dir = validate_and_normalize_dir(dir)?;

    fs::create_dir_all(&dir).map_err(|e| {
        Error::WriteFailure(format!(
            "Failed to create output directory '{}': {}",
            dir.display(),
            e
        ))
    })?;

    let mut operations = Vec::with_capacity(files.len());
    for file in files {
        let target_path = validate_output_path(&dir, &file.file_name)?;
        operations.push((target_path, file.contents.as_slice()));
    }

    write_files_atomic(&operations)?;

    Ok(files.iter().map(|f| f.file_name.clone()).collect())
}

/// Normalize `dir` and make it absolute.
fn validate_and_normalize_dir(dir: &Path) -> Result<PathBuf> {
    let cleaned = dir.clean();

    let absolute = if cleaned.is_absolute() {
        cleaned
    } else {
        std::env::current_dir()
            .map_err(|e| {
                Error::InvalidOutputPath(format!("Failed to get current directory: {}", e))
            })?
            .join(&cleaned)
            .clean()
    };

    Ok(absolute)
}

/// Resolve `filename` under `base_dir`, rejecting anything that escapes it.
fn validate_output_path(base_dir: &Path, filename: &str) -> Result<PathBuf> {
    if filename.contains('\0') {
        return Err(Error::InvalidOutputPath(
            "Filename contains null byte".to_string(),
        ));
    }

    let full_path = base_dir.join(Path::new(filename).clean()).clean();

    if !full_path.starts_with(base_dir) || full_path == base_dir {
        return Err(Error::InvalidOutputPath(format!(
            "Path '{}' escapes output directory '{}' (resolved to '{}')",
            filename,
            base_dir.display(),
            full_path.display()
        )));
    }

    Ok(full_path)
}

/// Two-phase write: stage every file in a temp file next to its target,
/// then persist them all. Staged files are removed when dropped, so an
/// early return cleans up after itself.
fn write_files_atomic(operations: &[(PathBuf, &[u8])]) -> Result<()> {
    let mut staged = Vec::with_capacity(operations.len());

    for (target_path, content) in operations {
        let parent = target_path.parent().ok_or_else(|| {
            Error::InvalidOutputPath(format!("'{}' has no parent", target_path.display()))
        })?;
        fs::create_dir_all(parent).map_err(|e| {
            Error::WriteFailure(format!(
                "Failed to create directory '{}': {}",
                parent.display(),
                e
            ))
        })?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| {
            Error::WriteFailure(format!(
                "Failed to create temporary file in '{}': {}",
                parent.display(),
                e
            ))
        })?;
        temp.write_all(content).map_err(|e| {
            Error::WriteFailure(format!(
                "Failed to write temporary file for '{}': {}",
                target_path.display(),
                e
            ))
        })?;

        staged.push((temp, target_path));
    }

    for (temp, target_path) in staged {
        temp.persist(target_path).map_err(|e| {
            Error::WriteFailure(format!(
                "Failed to move output into place at '{}': {}",
                target_path.display(),
                e.error
            ))
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_output_path_nested() {
        let base = Path::new("/tmp/output");
        let result = validate_output_path(base, "node/chunks/dep-abc.js").unwrap();
        assert_eq!(result, Path::new("/tmp/output/node/chunks/dep-abc.js"));
    }

    #[test]
    fn test_validate_output_path_traversal() {
        let base = Path::new("/tmp/output");
        for name in ["../etc/passwd", "safe/../../../../etc/passwd", "."] {
            let err = validate_output_path(base, name).unwrap_err();
            assert!(matches!(err, Error::InvalidOutputPath(_)), "{name}");
        }
    }

    #[test]
    fn test_validate_output_path_null_byte() {
        let base = Path::new("/tmp/output");
        assert!(validate_output_path(base, "file\0name.js").is_err());
    }

    #[test]
    fn writes_nested_files_and_replaces_existing() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("node")).unwrap();
        fs::write(dir.path().join("node/demo.js"), "stale").unwrap();

        let written = write_outputs(
            &[
                OutputFile::new("node/demo.js", "export {};"),
                OutputFile::new("node/demo.js.map", "{}"),
            ],
            dir.path(),
        )
        .unwrap();

        assert_eq!(written, vec!["node/demo.js", "node/demo.js.map"]);
        assert_eq!(
            fs::read_to_string(dir.path().join("node/demo.js")).unwrap(),
            "export {};"
        );
        let leftovers: Vec<_> = fs::read_dir(dir.path().join("node"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn rejected_path_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let err = write_outputs(
            &[
                OutputFile::new("node/ok.js", "ok"),
                OutputFile::new("../escape.js", "nope"),
            ],
            dir.path(),
        )
        .unwrap_err();

        assert!(matches!(err, Error::InvalidOutputPath(_)));
        assert!(!dir.path().join("node/ok.js").exists());
    }
}
