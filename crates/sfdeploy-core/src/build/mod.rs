//! Compile the extension sources and package them into a JAR.

pub mod classpath;
pub mod sources;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DeployConfig;
use crate::error::BuildError;
use crate::exec::{CommandOutput, CommandRunner, CommandSpec, path_arg};
use crate::platform::Platform;

pub use classpath::{Classpath, ClasspathSource};
pub use sources::{RemovalReport, find_class_files, find_java_files, remove_class_files};

#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Stale class files deleted before compiling
    pub stale_classes_removed: usize,
    pub sources: usize,
    pub classpath: Classpath,
    pub artifact: PathBuf,
}

/// Runs `javac` and `jar` from the configured toolchain.
pub struct Builder {
    runner: Arc<dyn CommandRunner>,
    platform: Platform,
}

impl Builder {
    pub fn new(runner: Arc<dyn CommandRunner>, platform: Platform) -> Self {
        Self { runner, platform }
    }

    pub fn build(&self, config: &DeployConfig) -> Result<BuildReport, BuildError> {
        let src_dir = config.sources_dir();

        let stale = remove_class_files(&src_dir);
        tracing::debug!(removed = stale.removed, "cleaned old class files");

        let java_files = find_java_files(&src_dir);
        if java_files.is_empty() {
            return Err(BuildError::NoSources(src_dir));
        }
        tracing::info!(count = java_files.len(), "compiling Java sources");

        let classpath = Classpath::from_lib_dir(&config.server(self.platform).lib_dir());

        let javac = self.platform.executable(&config.toolchain_path, "javac");
        let compile = CommandSpec::new(javac)
            .args(["-cp".to_string(), classpath.join(self.platform.classpath_separator())])
            .args(["-d".to_string(), path_arg(&src_dir)])
            .args(java_files.iter().map(|f| path_arg(f)))
            .current_dir(&src_dir);
        let output = self.run_tool(&compile)?;
        if !output.success {
            return Err(BuildError::CompileFailed {
                output: output.combined(),
            });
        }

        let artifact = config.artifact_path();
        let jar = self.platform.executable(&config.toolchain_path, "jar");
        let package = CommandSpec::new(jar)
            .args(["cf".to_string(), path_arg(&artifact), ".".to_string()])
            .current_dir(&src_dir);
        let output = self.run_tool(&package)?;
        if !output.success {
            return Err(BuildError::PackageFailed {
                output: output.combined(),
            });
        }

        Ok(BuildReport {
            stale_classes_removed: stale.removed,
            sources: java_files.len(),
            classpath,
            artifact,
        })
    }

    fn run_tool(&self, spec: &CommandSpec) -> Result<CommandOutput, BuildError> {
        self.runner.run(spec).map_err(|source| BuildError::ToolSpawn {
            tool: spec.program_name(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Os;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<CommandSpec>>,
        fail_compile: bool,
    }

    impl CommandRunner for RecordingRunner {
        fn run(&self, spec: &CommandSpec) -> anyhow::Result<CommandOutput> {
            self.calls.lock().unwrap().push(spec.clone());
            if spec.program_name() == "javac" && self.fail_compile {
                return Ok(CommandOutput::failed("Main.java:1: error: class expected"));
            }
            Ok(CommandOutput::ok(""))
        }
    }

    fn project(temp: &Path) -> DeployConfig {
        let source = temp.join("game");
        let target = temp.join("server");
        fs::create_dir_all(source.join("src/com/game")).unwrap();
        fs::create_dir_all(target.join("SFS2X/lib")).unwrap();
        fs::write(target.join("SFS2X/lib/sfs2x.jar"), "").unwrap();
        DeployConfig::new(source, target, "Game").with_toolchain(temp.join("jdk/bin"))
    }

    #[test]
    fn no_sources_fails_without_invoking_compiler() {
        let temp = TempDir::new().unwrap();
        let config = project(temp.path());
        let runner = Arc::new(RecordingRunner::default());
        let builder = Builder::new(runner.clone(), Platform::new(Os::Linux));

        let err = builder.build(&config).unwrap_err();

        assert!(matches!(err, BuildError::NoSources(_)));
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn compiles_then_packages() {
        let temp = TempDir::new().unwrap();
        let config = project(temp.path());
        fs::write(config.sources_dir().join("com/game/Main.java"), "").unwrap();
        fs::write(config.sources_dir().join("com/game/Old.class"), "").unwrap();
        let runner = Arc::new(RecordingRunner::default());
        let builder = Builder::new(runner.clone(), Platform::new(Os::Linux));

        let report = builder.build(&config).unwrap();

        assert_eq!(report.sources, 1);
        assert_eq!(report.stale_classes_removed, 1);
        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].program, temp.path().join("jdk/bin/javac"));
        assert_eq!(calls[0].args[0], "-cp");
        assert_eq!(calls[0].args[2], "-d");
        assert!(calls[0].args.last().unwrap().ends_with("Main.java"));
        assert_eq!(calls[1].program, temp.path().join("jdk/bin/jar"));
        assert_eq!(calls[1].args, vec!["cf".to_string(), path_arg(&config.artifact_path()), ".".to_string()]);
        assert_eq!(calls[1].cwd.as_deref(), Some(config.sources_dir().as_path()));
    }

    #[test]
    fn compiler_failure_carries_output_and_skips_packaging() {
        let temp = TempDir::new().unwrap();
        let config = project(temp.path());
        fs::write(config.sources_dir().join("com/game/Main.java"), "").unwrap();
        let runner = Arc::new(RecordingRunner {
            fail_compile: true,
            ..Default::default()
        });
        let builder = Builder::new(runner.clone(), Platform::new(Os::Linux));

        let err = builder.build(&config).unwrap_err();

        match err {
            BuildError::CompileFailed { output } => assert!(output.contains("class expected")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(runner.calls.lock().unwrap().len(), 1);
    }
}
