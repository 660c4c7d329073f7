//! Source and class file enumeration under the project `src` directory.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::validate::has_extension;

/// Outcome of deleting files in bulk; individual failures never abort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalReport {
    pub removed: usize,
    pub failures: Vec<(PathBuf, String)>,
}

/// All `.java` files below `dir`, in directory walk order.
pub fn find_java_files(dir: &Path) -> Vec<PathBuf> {
    files_with_extension(dir, "java")
}

/// All `.class` files below `dir`.
pub fn find_class_files(dir: &Path) -> Vec<PathBuf> {
    files_with_extension(dir, "class")
}

/// Delete every compiled `.class` file below `dir`.
pub fn remove_class_files(dir: &Path) -> RemovalReport {
    remove_all(find_class_files(dir))
}

pub(crate) fn remove_all(paths: impl IntoIterator<Item = PathBuf>) -> RemovalReport {
    let mut report = RemovalReport::default();
    for path in paths {
        match std::fs::remove_file(&path) {
            Ok(()) => report.removed += 1,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "could not remove file");
                report.failures.push((path, err.to_string()));
            }
        }
    }
    report
}

fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && has_extension(entry.path(), extension))
        .map(|entry| entry.into_path())
        .collect()
}
