//! JSON parser with helpful error messages

use std::path::Path;

use anyhow::{Context, Result};

use super::schema::DeployConfig;

/// Parse a saved configuration file
pub fn parse_config(path: &Path) -> Result<DeployConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse configuration content from string
pub fn parse_config_str(content: &str) -> Result<DeployConfig> {
    serde_json::from_str(content).map_err(|e| {
        anyhow::anyhow!(
            "{} (line {}, column {})",
            e,
            e.line(),
            e.column()
        )
    })
}

/// Serialize configuration as indented JSON
pub fn to_json(config: &DeployConfig) -> Result<String> {
    serde_json::to_string_pretty(config).context("Failed to serialize config to JSON")
}
