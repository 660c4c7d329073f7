//! sfdeploy core library
//!
//! Builds a SmartFoxServer 2X Java extension, deploys the archive into a
//! server installation and restarts the server in a fresh terminal window.
//! Frontends drive a [`pipeline::DeploymentPipeline`] through the
//! [`prompt::Operator`] seam.

pub mod build;
pub mod config;
pub mod deploy;
pub mod error;
pub mod exec;
pub mod layout;
pub mod pipeline;
pub mod platform;
pub mod process;
pub mod prompt;
pub mod setup;
pub mod toolchain;
pub mod validate;
pub mod wait;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, DeployConfig};

    // Pipeline
    pub use crate::pipeline::{
        DeploymentPipeline, PipelineFailure, PipelineSettings, PipelineState, RunSummary,
    };
    pub use crate::setup::ReusePolicy;

    // Errors
    pub use crate::error::{BuildError, DeployError, ErrorKind, PhaseError, RestartError, SetupError};

    // Seams
    pub use crate::exec::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};
    pub use crate::platform::{Os, Platform, ProcessControl};
    pub use crate::process::{ProcessInfo, ProcessInspector, ShellWindow, TerminalLauncher};
    pub use crate::prompt::{Notice, Operator};
}
