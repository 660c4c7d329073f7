//! On-disk layout of the source project and the server installation.

use std::path::{Path, PathBuf};

use crate::platform::Platform;

/// Port the SmartFoxServer instance listens on.
pub const SERVER_PORT: u16 = 9933;

/// Name of the archive produced by the build and deployed to the server.
pub const ARTIFACT_NAME: &str = "ServerExtension.jar";

/// Library archives whose absence is worth a warning during validation.
pub const EXPECTED_LIBRARIES: [&str; 2] = ["sfs2x.jar", "sfs2x-core.jar"];

const SOURCES_DIR: &str = "src";
const SERVER_DIR: &str = "SFS2X";
const LIB_DIR: &str = "lib";
const EXTENSIONS_DIR: &str = "extensions";

pub fn sources_dir(source_root: &Path) -> PathBuf {
    source_root.join(SOURCES_DIR)
}

pub fn artifact_path(source_root: &Path) -> PathBuf {
    source_root.join(ARTIFACT_NAME)
}

/// Paths inside a server installation.
#[derive(Debug, Clone)]
pub struct ServerLayout {
    root: PathBuf,
    platform: Platform,
}

impl ServerLayout {
    pub fn new(root: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            root: root.into(),
            platform,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn server_dir(&self) -> PathBuf {
        self.root.join(SERVER_DIR)
    }

    pub fn launcher(&self) -> PathBuf {
        self.server_dir().join(self.platform.launcher_script())
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.server_dir().join(LIB_DIR)
    }

    pub fn extension_dir(&self, extension_name: &str) -> PathBuf {
        self.server_dir().join(EXTENSIONS_DIR).join(extension_name)
    }

    pub fn wrapper_script(&self) -> PathBuf {
        self.root.join(self.platform.wrapper_script())
    }
}
