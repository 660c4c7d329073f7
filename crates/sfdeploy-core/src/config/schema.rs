//! Configuration schema for sfdeploy_config.json
//!
//! Field names on disk are kept stable across versions so a previously saved
//! configuration can always be offered for reuse.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout::{ServerLayout, artifact_path, sources_dir};
use crate::platform::Platform;

/// One deployment target: where sources live, where the server is installed,
/// which extension folder receives the archive, and which JDK builds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Project tree containing the `src` directory
    #[serde(rename = "source_dir")]
    pub source_root: PathBuf,

    /// SmartFoxServer installation root (contains `SFS2X`)
    #[serde(rename = "target_dir")]
    pub target_root: PathBuf,

    /// Folder name under `SFS2X/extensions`
    #[serde(rename = "extension_folder")]
    pub extension_name: String,

    /// Directory holding `javac` and `jar`
    #[serde(rename = "java_path", default)]
    pub toolchain_path: PathBuf,

    /// Directory holding additional JSON data files to deploy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_source_dir: Option<PathBuf>,

    /// JSON data files (relative to `json_source_dir`) copied next to the archive
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deploy_json_files: Vec<String>,
}

impl DeployConfig {
    pub fn new(
        source_root: impl Into<PathBuf>,
        target_root: impl Into<PathBuf>,
        extension_name: impl Into<String>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            target_root: target_root.into(),
            extension_name: extension_name.into(),
            toolchain_path: PathBuf::new(),
            json_source_dir: None,
            deploy_json_files: Vec::new(),
        }
    }

    pub fn with_toolchain(mut self, toolchain_path: impl Into<PathBuf>) -> Self {
        self.toolchain_path = toolchain_path.into();
        self
    }

    pub fn sources_dir(&self) -> PathBuf {
        sources_dir(&self.source_root)
    }

    pub fn artifact_path(&self) -> PathBuf {
        artifact_path(&self.source_root)
    }

    pub fn server(&self, platform: Platform) -> ServerLayout {
        ServerLayout::new(&self.target_root, platform)
    }

    pub fn extension_dir(&self, platform: Platform) -> PathBuf {
        self.server(platform).extension_dir(&self.extension_name)
    }

    /// Source paths of the extra JSON files, if any are configured.
    pub fn json_files(&self) -> Vec<PathBuf> {
        let Some(dir) = self.json_source_dir.as_deref() else {
            return Vec::new();
        };
        self.deploy_json_files
            .iter()
            .map(|name| resolve_json_file(dir, name))
            .collect()
    }
}

fn resolve_json_file(dir: &Path, name: &str) -> PathBuf {
    let path = Path::new(name);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}
