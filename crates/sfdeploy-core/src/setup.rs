//! Setup phase: resolve the configuration for this run.
//!
//! A saved configuration is offered for reuse first. When it is declined,
//! missing, unreadable or no longer valid, every value is collected from the
//! operator, re-prompting on invalid input, and the result is saved.

use std::path::PathBuf;

use crate::config::{ConfigStore, DeployConfig};
use crate::error::SetupError;
use crate::platform::Platform;
use crate::prompt::{Notice, Operator};
use crate::toolchain::ToolchainLocator;
use crate::validate::{
    detect_server, validate_extension_name, validate_source_tree, validate_target_tree,
};

/// What to do with a previously saved configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReusePolicy {
    /// Show it and ask.
    #[default]
    Ask,
    /// Use it without asking, as long as it still validates.
    Always,
}

pub struct Setup<'a> {
    store: &'a ConfigStore,
    platform: Platform,
    locator: &'a ToolchainLocator,
    server_candidates: &'a [PathBuf],
    reuse: ReusePolicy,
}

impl<'a> Setup<'a> {
    pub fn new(
        store: &'a ConfigStore,
        platform: Platform,
        locator: &'a ToolchainLocator,
        server_candidates: &'a [PathBuf],
    ) -> Self {
        Self {
            store,
            platform,
            locator,
            server_candidates,
            reuse: ReusePolicy::Ask,
        }
    }

    pub fn with_reuse(mut self, reuse: ReusePolicy) -> Self {
        self.reuse = reuse;
        self
    }

    pub fn run(&self, operator: &mut dyn Operator) -> Result<DeployConfig, SetupError> {
        let previous = match self.store.load() {
            Ok(previous) => previous,
            Err(err) => {
                tracing::warn!(path = %self.store.config_path().display(), error = %format!("{err:#}"), "ignoring unreadable configuration");
                operator.notice(Notice::Warning, "Saved configuration could not be read; starting fresh");
                None
            }
        };

        if let Some(previous) = &previous
            && self.offer_reuse(previous, operator)?
        {
            match self.check_saved(previous) {
                Ok(()) => return self.finish_reused(previous.clone(), operator),
                Err(err) => {
                    tracing::warn!(error = %err, "saved configuration is no longer valid");
                    operator.notice(Notice::Warning, &format!("Saved configuration is no longer valid: {err}"));
                }
            }
        }

        let config = self.collect(previous.as_ref(), operator)?;
        self.store.save(&config).map_err(SetupError::Config)?;
        operator.notice(
            Notice::Success,
            &format!("Configuration saved to {}", self.store.config_path().display()),
        );
        Ok(config)
    }

    fn offer_reuse(&self, previous: &DeployConfig, operator: &mut dyn Operator) -> Result<bool, SetupError> {
        operator.notice(Notice::Info, &describe(previous));
        match self.reuse {
            ReusePolicy::Always => Ok(true),
            ReusePolicy::Ask => operator
                .confirm("Use the previous configuration?")
                .map_err(SetupError::Prompt),
        }
    }

    fn check_saved(&self, config: &DeployConfig) -> Result<(), SetupError> {
        validate_source_tree(&config.source_root)?;
        validate_target_tree(&config.target_root, self.platform)?;
        validate_extension_name(&config.extension_name)
    }

    /// Keep the saved toolchain while its compiler is still Java 11, otherwise find another.
    fn finish_reused(
        &self,
        mut config: DeployConfig,
        operator: &mut dyn Operator,
    ) -> Result<DeployConfig, SetupError> {
        let javac = self.platform.executable(&config.toolchain_path, "javac");
        let usable = !config.toolchain_path.as_os_str().is_empty()
            && javac.is_file()
            && self.locator.is_compatible(&javac);
        if !usable {
            tracing::info!(toolchain = %config.toolchain_path.display(), "saved toolchain unusable, locating another");
            let toolchain = self.locator.locate_or_prompt(operator)?;
            operator.notice(
                Notice::Info,
                &format!("Using Java from {}", toolchain.bin_dir.display()),
            );
            config.toolchain_path = toolchain.bin_dir;
            self.store.save(&config).map_err(SetupError::Config)?;
        }
        operator.notice(Notice::Success, "Using previous configuration");
        Ok(config)
    }

    fn collect(
        &self,
        previous: Option<&DeployConfig>,
        operator: &mut dyn Operator,
    ) -> Result<DeployConfig, SetupError> {
        let source_root = ask_until(operator, "Source project directory (contains 'src')", |answer| {
            let path = PathBuf::from(answer);
            validate_source_tree(&path).map(|()| path)
        })?;

        let target_root = self.collect_target(operator)?;

        let extension_name = ask_until(operator, "Extension folder name", |answer| {
            validate_extension_name(answer).map(|()| answer.to_string())
        })?;

        let toolchain = self.locator.locate_or_prompt(operator)?;
        operator.notice(
            Notice::Info,
            &format!("Using Java from {}", toolchain.bin_dir.display()),
        );

        let mut config =
            DeployConfig::new(source_root, target_root, extension_name).with_toolchain(toolchain.bin_dir);
        if let Some(previous) = previous {
            config.json_source_dir = previous.json_source_dir.clone();
            config.deploy_json_files = previous.deploy_json_files.clone();
        }
        Ok(config)
    }

    fn collect_target(&self, operator: &mut dyn Operator) -> Result<PathBuf, SetupError> {
        if let Some(found) = detect_server(self.server_candidates, self.platform) {
            let accepted = operator
                .confirm(&format!("Found SmartFoxServer at {}. Use it?", found.display()))
                .map_err(SetupError::Prompt)?;
            if accepted {
                return Ok(found);
            }
        }

        let platform = self.platform;
        let (path, report) = ask_until(operator, "SmartFoxServer installation directory", |answer| {
            let path = PathBuf::from(answer);
            validate_target_tree(&path, platform).map(|report| (path, report))
        })?;
        for warning in &report.warnings {
            operator.notice(Notice::Warning, warning);
        }
        Ok(path)
    }
}

/// Prompt until `check` accepts the trimmed, unquoted answer.
fn ask_until<T>(
    operator: &mut dyn Operator,
    prompt: &str,
    check: impl Fn(&str) -> Result<T, SetupError>,
) -> Result<T, SetupError> {
    loop {
        let answer = operator.input(prompt).map_err(SetupError::Prompt)?;
        let answer = answer.trim().trim_matches('"');
        match check(answer) {
            Ok(value) => return Ok(value),
            Err(err) => operator.notice(Notice::Error, &err.to_string()),
        }
    }
}

fn describe(config: &DeployConfig) -> String {
    format!(
        "Previous configuration:\n  Source:    {}\n  Target:    {}\n  Extension: {}\n  Java:      {}",
        config.source_root.display(),
        config.target_root.display(),
        config.extension_name,
        config.toolchain_path.display()
    )
}
