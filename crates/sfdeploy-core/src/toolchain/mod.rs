//! JDK discovery.
//!
//! Resolution order, first success wins:
//!
//! | Strategy    | Candidate                                  | Version-checked |
//! |-------------|--------------------------------------------|-----------------|
//! | `JavaHome`  | `$JAVA_HOME/bin/javac`                     | yes             |
//! | `SearchPath`| `javac` resolved through `PATH`            | yes             |
//! | `WellKnown` | platform install globs (see [`Platform`])  | yes             |
//! | `Manual`    | directory typed in by the operator         | no              |
//!
//! A candidate is compatible when `javac -version` mentions one of the
//! expected version tokens in its combined output.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::SetupError;
use crate::exec::{CommandRunner, CommandSpec};
use crate::platform::Platform;
use crate::prompt::{Notice, Operator};

/// Substrings of `javac -version` output that identify a Java 11 compiler.
pub const EXPECTED_VERSION_TOKENS: [&str; 2] = ["javac 11", "11."];

const COMPILER: &str = "javac";

/// Where a toolchain was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainSource {
    JavaHome,
    SearchPath,
    WellKnown,
    Manual,
}

/// A resolved JDK `bin` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub bin_dir: PathBuf,
    pub source: ToolchainSource,
}

type PathLookup = Box<dyn Fn(&str) -> Option<PathBuf> + Send + Sync>;

pub struct ToolchainLocator {
    runner: Arc<dyn CommandRunner>,
    platform: Platform,
    java_home: Option<PathBuf>,
    path_lookup: PathLookup,
    glob_patterns: Vec<String>,
}

impl ToolchainLocator {
    /// Locator using the process environment, `PATH` and the platform's install globs.
    pub fn new(runner: Arc<dyn CommandRunner>, platform: Platform) -> Self {
        let java_home = std::env::var_os("JAVA_HOME")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self {
            runner,
            platform,
            java_home,
            path_lookup: Box::new(|name| which::which(name).ok()),
            glob_patterns: platform.toolchain_globs(),
        }
    }

    pub fn with_java_home(mut self, java_home: Option<PathBuf>) -> Self {
        self.java_home = java_home;
        self
    }

    pub fn with_path_lookup(
        mut self,
        lookup: impl Fn(&str) -> Option<PathBuf> + Send + Sync + 'static,
    ) -> Self {
        self.path_lookup = Box::new(lookup);
        self
    }

    pub fn with_glob_patterns(mut self, patterns: Vec<String>) -> Self {
        self.glob_patterns = patterns;
        self
    }

    /// Try every automatic strategy in order.
    pub fn locate(&self) -> Option<Toolchain> {
        self.from_java_home()
            .or_else(|| self.from_search_path())
            .or_else(|| self.from_well_known())
    }

    /// Automatic strategies, then ask the operator for a directory.
    pub fn locate_or_prompt(&self, operator: &mut dyn Operator) -> Result<Toolchain, SetupError> {
        if let Some(toolchain) = self.locate() {
            return Ok(toolchain);
        }

        operator.notice(Notice::Warning, "Java 11 not found automatically");
        let answer = operator
            .input("Path to the Java 11 bin directory (leave empty to skip)")
            .map_err(SetupError::Prompt)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(SetupError::ToolchainNotFound);
        }

        let bin_dir = PathBuf::from(answer);
        if self.platform.executable(&bin_dir, COMPILER).is_file() {
            return Ok(Toolchain {
                bin_dir,
                source: ToolchainSource::Manual,
            });
        }
        tracing::warn!(dir = %bin_dir.display(), "no javac in the given directory");
        Err(SetupError::ToolchainNotFound)
    }

    /// Whether `javac` reports the expected major version.
    pub fn is_compatible(&self, javac: &Path) -> bool {
        let spec = CommandSpec::new(javac).arg("-version");
        match self.runner.run(&spec) {
            Ok(output) if output.success => {
                let text = output.combined();
                EXPECTED_VERSION_TOKENS.iter().any(|token| text.contains(token))
            }
            Ok(output) => {
                tracing::debug!(javac = %javac.display(), output = %output.combined(), "version check failed");
                false
            }
            Err(err) => {
                tracing::debug!(javac = %javac.display(), error = %err, "version check could not run");
                false
            }
        }
    }

    fn from_java_home(&self) -> Option<Toolchain> {
        let home = self.java_home.as_ref()?;
        let javac = self.platform.executable(&home.join("bin"), COMPILER);
        self.accept(&javac, ToolchainSource::JavaHome)
    }

    fn from_search_path(&self) -> Option<Toolchain> {
        let javac = (self.path_lookup)(COMPILER)?;
        self.accept(&javac, ToolchainSource::SearchPath)
    }

    fn from_well_known(&self) -> Option<Toolchain> {
        self.glob_patterns.iter().find_map(|pattern| {
            let matches = match glob::glob(pattern) {
                Ok(paths) => paths,
                Err(err) => {
                    tracing::debug!(pattern = %pattern, error = %err, "invalid toolchain pattern");
                    return None;
                }
            };
            matches
                .filter_map(Result::ok)
                .find_map(|javac| self.accept(&javac, ToolchainSource::WellKnown))
        })
    }

    fn accept(&self, javac: &Path, source: ToolchainSource) -> Option<Toolchain> {
        if !javac.is_file() || !self.is_compatible(javac) {
            return None;
        }
        let bin_dir = javac.parent()?.to_path_buf();
        tracing::debug!(dir = %bin_dir.display(), ?source, "found compatible toolchain");
        Some(Toolchain { bin_dir, source })
    }
}
