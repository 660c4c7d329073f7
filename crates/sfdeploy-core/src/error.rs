//! Error types for each pipeline phase.
//!
//! Every phase converts its internal failures into one of these enums so the
//! pipeline can abort with a typed cause instead of a printed message.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a phase failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad source/target path, missing toolchain, invalid extension name.
    Validation,
    /// No sources, or the compiler/packager exited non-zero.
    Build,
    /// Extension directory creation or archive copy failed.
    Transfer,
    /// The relaunch wrapper or terminal could not be created.
    ProcessManagement,
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(
        "invalid source directory {}: expected a 'src' folder containing .java files",
        .0.display()
    )]
    InvalidSourceTree(PathBuf),

    #[error("invalid target directory {}: {reason}", path.display())]
    InvalidTargetTree { path: PathBuf, reason: String },

    #[error(
        "invalid extension folder name '{0}': use a simple folder name (no paths, colons, or slashes)"
    )]
    InvalidExtensionName(String),

    #[error("no compatible Java 11 compiler found")]
    ToolchainNotFound,

    #[error("configuration error: {0:#}")]
    Config(#[source] anyhow::Error),

    #[error("input aborted: {0:#}")]
    Prompt(#[source] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no Java files found under {}", .0.display())]
    NoSources(PathBuf),

    #[error("failed to run {tool}: {source:#}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("compilation failed:\n{output}")]
    CompileFailed { output: String },

    #[error("JAR creation failed:\n{output}")]
    PackageFailed { output: String },
}

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("failed to create extension directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("built archive not found at {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum RestartError {
    #[error("failed to create launch script {}: {source}", path.display())]
    WrapperScript {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start server terminal: {0}")]
    Spawn(#[source] std::io::Error),
}

/// A failure reported by any phase handler.
#[derive(Debug, Error)]
pub enum PhaseError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Deploy(#[from] DeployError),
    #[error(transparent)]
    Restart(#[from] RestartError),
}

impl PhaseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PhaseError::Setup(_) => ErrorKind::Validation,
            PhaseError::Build(_) => ErrorKind::Build,
            PhaseError::Deploy(_) => ErrorKind::Transfer,
            PhaseError::Restart(_) => ErrorKind::ProcessManagement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_phase() {
        let err: PhaseError = BuildError::NoSources(PathBuf::from("src")).into();
        assert_eq!(err.kind(), ErrorKind::Build);

        let err: PhaseError = SetupError::ToolchainNotFound.into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: PhaseError = DeployError::MissingArtifact(PathBuf::from("ServerExtension.jar")).into();
        assert_eq!(err.kind(), ErrorKind::Transfer);

        let err: PhaseError = RestartError::Spawn(std::io::Error::other("boom")).into();
        assert_eq!(err.kind(), ErrorKind::ProcessManagement);
    }

    #[test]
    fn compile_failure_surfaces_tool_output_verbatim() {
        let err = BuildError::CompileFailed {
            output: "Foo.java:3: error: ';' expected".to_string(),
        };
        assert!(err.to_string().contains("Foo.java:3: error: ';' expected"));
    }
}
