//! Config path resolution helpers.

use std::path::{Path, PathBuf};

/// File name of the saved configuration.
pub const CONFIG_FILE_NAME: &str = "sfdeploy_config.json";

/// The configuration lives next to where the tool is run from.
pub fn default_config_path(working_dir: &Path) -> PathBuf {
    working_dir.join(CONFIG_FILE_NAME)
}
