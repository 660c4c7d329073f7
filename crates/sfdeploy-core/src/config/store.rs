//! Config store for loading and saving sfdeploy_config.json.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{DeployConfig, parser, paths::default_config_path};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    /// Store rooted in the current working directory.
    pub fn from_current_dir() -> anyhow::Result<Self> {
        let working_dir =
            std::env::current_dir().context("Could not determine current directory")?;
        Ok(Self::from_path(default_config_path(&working_dir)))
    }

    pub fn from_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load the saved configuration, `None` if nothing was saved yet.
    pub fn load(&self) -> anyhow::Result<Option<DeployConfig>> {
        if !self.config_path.exists() {
            return Ok(None);
        }
        parser::parse_config(&self.config_path).map(Some)
    }

    pub fn save(&self, config: &DeployConfig) -> anyhow::Result<()> {
        let content = parser::to_json(config)?;
        if let Some(parent) = self.config_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.config_path, content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;
        Ok(())
    }
}
