//! Persisted deployment configuration.
//!
//! A single JSON record (`sfdeploy_config.json`) remembers the source project,
//! server installation, extension folder and resolved JDK between runs.

pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use parser::{parse_config, parse_config_str, to_json};
pub use paths::{CONFIG_FILE_NAME, default_config_path};
pub use schema::DeployConfig;
pub use store::ConfigStore;
