//! Auto-detection of a SmartFoxServer installation.

use std::path::{Path, PathBuf};

use crate::platform::Platform;

use super::validate_target_tree;

const INSTALL_DIR_NAMES: [&str; 3] = ["SmartFoxServer_2X", "SmartFoxServer", "SFS2X"];
const WINDOWS_DRIVES: [&str; 4] = ["C:", "D:", "E:", "F:"];

/// Candidate installation roots, in search order.
pub fn candidate_roots(platform: Platform, home: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if platform.is_windows() {
        candidates.extend([
            PathBuf::from("C:\\SmartFoxServer_2X"),
            PathBuf::from("C:\\Program Files\\SmartFoxServer_2X"),
            PathBuf::from("C:\\Program Files (x86)\\SmartFoxServer_2X"),
        ]);
    } else {
        candidates.extend([
            PathBuf::from("/opt/SmartFoxServer_2X"),
            PathBuf::from("/usr/local/SmartFoxServer_2X"),
        ]);
    }

    if let Some(home) = home {
        candidates.extend([
            home.join("SmartFoxServer_2X"),
            home.join("SmartFoxServer"),
            home.join("Desktop").join("SmartFoxServer_2X"),
            home.join("Downloads").join("SmartFoxServer_2X"),
        ]);
    }

    if platform.is_windows() {
        for drive in WINDOWS_DRIVES {
            for name in INSTALL_DIR_NAMES {
                candidates.push(PathBuf::from(format!("{drive}\\{name}")));
                candidates.push(PathBuf::from(format!("{drive}\\Program Files\\{name}")));
                candidates.push(PathBuf::from(format!("{drive}\\Program Files (x86)\\{name}")));
            }
        }
    }

    let mut seen = std::collections::HashSet::new();
    candidates.retain(|path| seen.insert(path.clone()));
    candidates
}

/// First candidate that passes target validation.
pub fn detect_server(candidates: &[PathBuf], platform: Platform) -> Option<PathBuf> {
    candidates
        .iter()
        .find(|path| validate_target_tree(path, platform).is_ok())
        .cloned()
}
