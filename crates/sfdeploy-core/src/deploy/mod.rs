//! Artifact transfer into the server and post-deploy cleanup.

pub mod cleanup;
pub mod executor;

use std::path::{Path, PathBuf};

use crate::build::classpath::glob_in;

pub use cleanup::{CleanupReport, cleanup_source_tree};
pub use executor::{DeployReport, TransferOptions, deploy_artifact, prepare_extension_dir};

/// `*.jar` files directly inside `dir`, sorted by name.
pub fn archives_in(dir: &Path) -> Vec<PathBuf> {
    glob_in(dir, "*.jar")
        .into_iter()
        .filter(|path| path.is_file())
        .collect()
}
