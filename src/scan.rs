//! Input expansion.
//!
//! Turns the user's ordered list of paths into the ordered batch that gets
//! analyzed. The position of a path in the expanded batch is its 1-based
//! image index in every report.
//!
//! - **Files** are kept as given, in the order given. Nothing is checked here:
//!   a missing or unreadable path still takes a slot and fails later with
//!   `FileUnavailable`, so indices always line up with what was submitted.
//! - **Directories** expand in place to the `.bmp` files they contain
//!   (case-insensitive extension), sorted by path. With `recursive` set,
//!   subdirectories are walked too.

use crate::config::ScanConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const BMP_EXTENSION: &str = "bmp";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Expand `inputs` into the list of files to analyze.
pub fn expand_inputs(inputs: &[PathBuf], config: &ScanConfig) -> Result<Vec<PathBuf>, ScanError> {
    let mut batch = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = collect_bmp_files(input, config.recursive)?;
            log::debug!("{}: {} BMP files", input.display(), found.len());
            batch.extend(found);
        } else {
            batch.push(input.clone());
        }
    }
    Ok(batch)
}

/// Whether the path has a `.bmp` extension (any case).
pub fn is_bmp_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(BMP_EXTENSION))
}

fn collect_bmp_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>, ScanError> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && is_bmp_path(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn files_kept_in_given_order() {
        let inputs = vec![PathBuf::from("b.bmp"), PathBuf::from("a.bmp")];
        let batch = expand_inputs(&inputs, &ScanConfig::default()).unwrap();
        assert_eq!(batch, inputs);
    }

    #[test]
    fn missing_files_keep_their_slot() {
        let inputs = vec![PathBuf::from("/definitely/not/here.bmp")];
        let batch = expand_inputs(&inputs, &ScanConfig::default()).unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn non_bmp_extension_file_kept_when_named_explicitly() {
        let inputs = vec![PathBuf::from("photo.dat")];
        let batch = expand_inputs(&inputs, &ScanConfig::default()).unwrap();
        assert_eq!(batch, inputs);
    }

    #[test]
    fn directory_expands_to_sorted_bmp_files() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("b.bmp"));
        touch(&tmp.path().join("a.BMP"));
        touch(&tmp.path().join("notes.txt"));
        touch(&tmp.path().join("sub/c.bmp"));

        let batch = expand_inputs(&[tmp.path().to_path_buf()], &ScanConfig::default()).unwrap();
        assert_eq!(
            batch,
            vec![tmp.path().join("a.BMP"), tmp.path().join("b.bmp")]
        );
    }

    #[test]
    fn recursive_scan_includes_subdirectories() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("a.bmp"));
        touch(&tmp.path().join("sub/deeper/c.bmp"));

        let config = ScanConfig { recursive: true };
        let batch = expand_inputs(&[tmp.path().to_path_buf()], &config).unwrap();
        assert_eq!(
            batch,
            vec![
                tmp.path().join("a.bmp"),
                tmp.path().join("sub/deeper/c.bmp")
            ]
        );
    }

    #[test]
    fn directory_expands_in_place() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("dir/x.bmp"));
        let inputs = vec![
            PathBuf::from("first.bmp"),
            tmp.path().join("dir"),
            PathBuf::from("last.bmp"),
        ];
        let batch = expand_inputs(&inputs, &ScanConfig::default()).unwrap();
        assert_eq!(
            batch,
            vec![
                PathBuf::from("first.bmp"),
                tmp.path().join("dir/x.bmp"),
                PathBuf::from("last.bmp")
            ]
        );
    }

    #[test]
    fn is_bmp_path_cases() {
        assert!(is_bmp_path(Path::new("a.bmp")));
        assert!(is_bmp_path(Path::new("a.Bmp")));
        assert!(!is_bmp_path(Path::new("a.bmp.txt")));
        assert!(!is_bmp_path(Path::new("bmp")));
    }
}
