//! Copy the built archive into the server's extension directory.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use crate::error::DeployError;
use crate::wait::retry;

use super::archives_in;

/// Archive removal can fail while the old server still holds file locks.
pub const LOCK_RETRY_ATTEMPTS: usize = 10;
pub const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    pub lock_retry_attempts: usize,
    pub lock_retry_interval: Duration,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            lock_retry_attempts: LOCK_RETRY_ATTEMPTS,
            lock_retry_interval: LOCK_RETRY_INTERVAL,
        }
    }
}

#[derive(Debug, Default)]
pub struct DeployReport {
    pub deployed: PathBuf,
    pub removed_archives: Vec<PathBuf>,
    pub extra_files: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

/// Create the extension directory, including missing parents.
pub fn prepare_extension_dir(dir: &Path) -> Result<(), DeployError> {
    std::fs::create_dir_all(dir).map_err(|source| DeployError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Replace every archive in `extension_dir` with `artifact`, then copy `extra_files` alongside.
///
/// Stale archives that cannot be removed and missing extra files are warnings;
/// failing to copy the artifact itself is fatal.
pub fn deploy_artifact(
    artifact: &Path,
    extension_dir: &Path,
    extra_files: &[PathBuf],
    options: TransferOptions,
) -> Result<DeployReport, DeployError> {
    if !artifact.is_file() {
        return Err(DeployError::MissingArtifact(artifact.to_path_buf()));
    }

    let mut report = DeployReport::default();

    for stale in archives_in(extension_dir) {
        let removed = retry(options.lock_retry_attempts, options.lock_retry_interval, || {
            std::fs::remove_file(&stale)
        });
        match removed {
            Ok(()) => report.removed_archives.push(stale),
            Err(err) => {
                tracing::warn!(path = %stale.display(), error = %err, "could not remove old archive");
                report
                    .warnings
                    .push(format!("Could not remove {}: {}", stale.display(), err));
            }
        }
    }

    let target = extension_dir.join(file_name(artifact)?);
    std::fs::copy(artifact, &target).map_err(|source| DeployError::Copy {
        from: artifact.to_path_buf(),
        to: target.clone(),
        source,
    })?;
    report.deployed = target;

    for extra in extra_files {
        let Ok(name) = file_name(extra) else {
            report
                .warnings
                .push(format!("Skipping {}: not a file name", extra.display()));
            continue;
        };
        let destination = extension_dir.join(name);
        match std::fs::copy(extra, &destination) {
            Ok(_) => report.extra_files.push(destination),
            Err(err) => {
                tracing::warn!(path = %extra.display(), error = %err, "could not deploy data file");
                report
                    .warnings
                    .push(format!("Could not copy {}: {}", extra.display(), err));
            }
        }
    }

    Ok(report)
}

fn file_name(path: &Path) -> Result<&std::ffi::OsStr, DeployError> {
    match path.components().next_back() {
        Some(Component::Normal(name)) => Ok(name),
        _ => Err(DeployError::MissingArtifact(path.to_path_buf())),
    }
}
