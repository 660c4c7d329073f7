//! Compile classpath assembled from the server's library directory.

use std::path::{Path, PathBuf};

use crate::exec::path_arg;

/// How the classpath entries were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClasspathSource {
    /// Every `*.jar` in the library directory.
    AllArchives,
    /// Nothing matched; the current directory is used.
    CurrentDir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classpath {
    pub entries: Vec<PathBuf>,
    pub source: ClasspathSource,
}

impl Classpath {
    /// Collect archives from `lib_dir`, falling back to `.` when there are none.
    pub fn from_lib_dir(lib_dir: &Path) -> Self {
        let entries = glob_in(lib_dir, "*.jar");
        if !entries.is_empty() {
            return Self {
                entries,
                source: ClasspathSource::AllArchives,
            };
        }

        tracing::warn!(dir = %lib_dir.display(), "no JAR files found, compiling with '.' as classpath");
        Self {
            entries: Vec::new(),
            source: ClasspathSource::CurrentDir,
        }
    }

    /// The `-cp` argument value.
    pub fn join(&self, separator: &str) -> String {
        if self.entries.is_empty() {
            return ".".to_string();
        }
        self.entries
            .iter()
            .map(|p| path_arg(p))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Matches of `pattern` directly inside `dir`, which is escaped.
pub(crate) fn glob_in(dir: &Path, pattern: &str) -> Vec<PathBuf> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let full = format!("{}{}{}", escaped, std::path::MAIN_SEPARATOR, pattern);
    match glob::glob(&full) {
        Ok(paths) => paths.filter_map(Result::ok).collect(),
        Err(err) => {
            tracing::debug!(pattern = %full, error = %err, "invalid classpath pattern");
            Vec::new()
        }
    }
}
