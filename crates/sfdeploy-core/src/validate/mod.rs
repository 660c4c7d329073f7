//! Validation of source trees, server installations and extension names.

pub mod detect;

use std::path::Path;

use walkdir::WalkDir;

use crate::error::SetupError;
use crate::layout::{EXPECTED_LIBRARIES, ServerLayout, sources_dir};
use crate::platform::Platform;

pub use detect::{candidate_roots, detect_server};

/// Non-fatal findings from validating a server installation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetReport {
    pub warnings: Vec<String>,
}

/// Check that `path` exists and its `src` directory holds at least one `.java` file.
pub fn validate_source_tree(path: &Path) -> Result<(), SetupError> {
    let src = sources_dir(path);
    if !path.is_dir() || !src.is_dir() || !has_java_sources(&src) {
        return Err(SetupError::InvalidSourceTree(path.to_path_buf()));
    }
    Ok(())
}

/// Check that `path` is a server installation with a launcher script.
///
/// Missing library archives only produce warnings: the classpath falls back
/// to whatever the library directory does contain.
pub fn validate_target_tree(path: &Path, platform: Platform) -> Result<TargetReport, SetupError> {
    let layout = ServerLayout::new(path, platform);

    let server_dir = layout.server_dir();
    if !server_dir.is_dir() {
        return Err(SetupError::InvalidTargetTree {
            path: path.to_path_buf(),
            reason: format!("missing {}", server_dir.display()),
        });
    }

    let launcher = layout.launcher();
    if !launcher.is_file() {
        return Err(SetupError::InvalidTargetTree {
            path: path.to_path_buf(),
            reason: format!("missing launcher {}", launcher.display()),
        });
    }

    let lib_dir = layout.lib_dir();
    let warnings = EXPECTED_LIBRARIES
        .iter()
        .map(|name| lib_dir.join(name))
        .filter(|jar| !jar.exists())
        .map(|jar| format!("{} not found at {}", file_name(&jar), jar.display()))
        .collect::<Vec<_>>();

    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    Ok(TargetReport { warnings })
}

/// Extension names must be a single folder name so deploys stay inside `extensions/`.
pub fn validate_extension_name(name: &str) -> Result<(), SetupError> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains([':', '\\', '/']);
    if invalid {
        return Err(SetupError::InvalidExtensionName(name.to_string()));
    }
    Ok(())
}

/// Whether `dir` contains a `.java` file anywhere below it. Stops at the first match.
pub fn has_java_sources(dir: &Path) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .any(|entry| entry.file_type().is_file() && has_extension(entry.path(), "java"))
}

/// Case-insensitive extension check.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
