//! Post-deploy removal of build byproducts from the source project.

use std::path::{Path, PathBuf};

use crate::build::sources::{find_class_files, remove_all};
use crate::layout::sources_dir;

use super::archives_in;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub classes_removed: usize,
    pub archives_removed: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, String)>,
}

impl CleanupReport {
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
}

/// Remove every `.class` under `src` and every `*.jar` in the project root.
///
/// Files are removed whether or not this run produced them. Individual
/// failures are collected, never returned as errors.
pub fn cleanup_source_tree(source_root: &Path) -> CleanupReport {
    let classes = remove_all(find_class_files(&sources_dir(source_root)));

    let mut archives_removed = Vec::new();
    let mut failures = classes.failures;
    for archive in archives_in(source_root) {
        match std::fs::remove_file(&archive) {
            Ok(()) => archives_removed.push(archive),
            Err(err) => {
                tracing::warn!(path = %archive.display(), error = %err, "could not remove archive");
                failures.push((archive, err.to_string()));
            }
        }
    }

    CleanupReport {
        classes_removed: classes.removed,
        archives_removed,
        failures,
    }
}
