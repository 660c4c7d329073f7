//! The five-phase deployment state machine.
//!
//! `Setup -> Build -> Deploy -> Restart -> Cleanup -> Done`. Any phase error
//! moves the run to `Aborted`; nothing is retried or rolled back, and a new
//! run always starts at `Setup`.

pub mod state;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::build::{BuildReport, Builder};
use crate::config::{ConfigStore, DeployConfig};
use crate::deploy::{
    CleanupReport, DeployReport, TransferOptions, cleanup_source_tree, deploy_artifact,
    prepare_extension_dir,
};
use crate::error::{PhaseError, RestartError};
use crate::exec::{CommandRunner, SystemRunner};
use crate::layout::SERVER_PORT;
use crate::platform::Platform;
use crate::process::manager::{POLL_INTERVAL, PROCESS_EXIT_TIMEOUT};
use crate::process::{
    ProcessInspector, ProcessManager, RelaunchReport, ShellWindow, SystemLauncher,
    TerminalLauncher, TerminationReport, WRAPPER_CLEANUP_DELAY, inspector_for,
};
use crate::prompt::{Notice, Operator};
use crate::setup::{ReusePolicy, Setup};
use crate::toolchain::ToolchainLocator;
use crate::validate::candidate_roots;

pub use state::PipelineState;

/// Timing and port knobs. Defaults match a local SmartFoxServer install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    pub port: u16,
    /// Upper bound on waiting for terminated listeners to disappear.
    pub process_exit_timeout: Duration,
    pub poll_interval: Duration,
    pub lock_retry_attempts: usize,
    pub lock_retry_interval: Duration,
    pub wrapper_cleanup_delay: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        let transfer = TransferOptions::default();
        Self {
            port: SERVER_PORT,
            process_exit_timeout: PROCESS_EXIT_TIMEOUT,
            poll_interval: POLL_INTERVAL,
            lock_retry_attempts: transfer.lock_retry_attempts,
            lock_retry_interval: transfer.lock_retry_interval,
            wrapper_cleanup_delay: WRAPPER_CLEANUP_DELAY,
        }
    }
}

impl PipelineSettings {
    fn transfer(&self) -> TransferOptions {
        TransferOptions {
            lock_retry_attempts: self.lock_retry_attempts,
            lock_retry_interval: self.lock_retry_interval,
        }
    }
}

/// Everything a successful run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub config: DeployConfig,
    pub build: BuildReport,
    /// Terminal window that hosted the previous server, if one was found.
    pub window: Option<ShellWindow>,
    pub termination: TerminationReport,
    pub transfer: DeployReport,
    pub relaunch: RelaunchReport,
    pub cleanup: CleanupReport,
    pub transitions: Vec<PipelineState>,
}

/// A run that ended in `Aborted`.
#[derive(Debug, Error)]
#[error("{state} failed: {error}")]
pub struct PipelineFailure {
    /// Phase whose handler failed.
    pub state: PipelineState,
    #[source]
    pub error: PhaseError,
    pub transitions: Vec<PipelineState>,
}

/// Records state transitions and turns phase errors into [`PipelineFailure`].
struct Trail {
    states: Vec<PipelineState>,
}

impl Trail {
    fn enter(&mut self, state: PipelineState) {
        tracing::info!(phase = %state, "entering phase");
        self.states.push(state);
    }

    fn finish<T, E: Into<PhaseError>>(
        &mut self,
        state: PipelineState,
        result: Result<T, E>,
    ) -> Result<T, PipelineFailure> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                let error = err.into();
                tracing::error!(phase = %state, kind = ?error.kind(), error = %error, "phase failed");
                self.states.push(PipelineState::Aborted);
                Err(PipelineFailure {
                    state,
                    error,
                    transitions: std::mem::take(&mut self.states),
                })
            }
        }
    }
}

pub struct DeploymentPipeline<'a> {
    operator: &'a mut dyn Operator,
    store: ConfigStore,
    platform: Platform,
    runner: Arc<dyn CommandRunner>,
    inspector: Option<Arc<dyn ProcessInspector>>,
    launcher: Arc<dyn TerminalLauncher>,
    locator: Option<ToolchainLocator>,
    settings: PipelineSettings,
    server_candidates: Vec<PathBuf>,
    reuse: ReusePolicy,
}

impl<'a> DeploymentPipeline<'a> {
    /// Pipeline wired to the real OS: system commands, native inspector, detached terminals.
    pub fn new(operator: &'a mut dyn Operator, store: ConfigStore, platform: Platform) -> Self {
        let home = dirs::home_dir();
        Self {
            operator,
            store,
            platform,
            runner: Arc::new(SystemRunner),
            inspector: None,
            launcher: Arc::new(SystemLauncher),
            locator: None,
            settings: PipelineSettings::default(),
            server_candidates: candidate_roots(platform, home.as_deref()),
            reuse: ReusePolicy::Ask,
        }
    }

    /// Runner for compiler and OS tools. Also used by the default inspector and locator.
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_inspector(mut self, inspector: Arc<dyn ProcessInspector>) -> Self {
        self.inspector = Some(inspector);
        self
    }

    pub fn with_launcher(mut self, launcher: Arc<dyn TerminalLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn with_locator(mut self, locator: ToolchainLocator) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn with_settings(mut self, settings: PipelineSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_server_candidates(mut self, candidates: Vec<PathBuf>) -> Self {
        self.server_candidates = candidates;
        self
    }

    pub fn with_reuse(mut self, reuse: ReusePolicy) -> Self {
        self.reuse = reuse;
        self
    }

    /// Drive every phase to `Done`, or stop at the first failure.
    pub fn run(mut self) -> Result<RunSummary, PipelineFailure> {
        let mut trail = Trail { states: Vec::new() };

        trail.enter(PipelineState::Setup);
        self.announce(PipelineState::Setup, "Configuration");
        let setup = self.setup();
        let config = trail.finish(PipelineState::Setup, setup)?;

        trail.enter(PipelineState::Build);
        self.announce(PipelineState::Build, "Compiling extension");
        let build = self.build(&config);
        let build = trail.finish(PipelineState::Build, build)?;

        trail.enter(PipelineState::Deploy);
        self.announce(PipelineState::Deploy, "Deploying to server");
        let manager = self.process_manager();
        let deployed = self.deploy(&config, &manager);
        let (window, termination, transfer) = trail.finish(PipelineState::Deploy, deployed)?;

        trail.enter(PipelineState::Restart);
        self.announce(PipelineState::Restart, "Restarting server");
        let relaunched = self.restart(&config, &manager, window.as_ref());
        let relaunch = trail.finish(PipelineState::Restart, relaunched)?;

        trail.enter(PipelineState::Cleanup);
        self.announce(PipelineState::Cleanup, "Cleaning up");
        let cleanup = self.cleanup(&config);

        trail.enter(PipelineState::Done);
        self.operator.notice(Notice::Success, "Deployment complete");

        Ok(RunSummary {
            config,
            build,
            window,
            termination,
            transfer,
            relaunch,
            cleanup,
            transitions: trail.states,
        })
    }

    fn announce(&mut self, state: PipelineState, title: &str) {
        let step = state.step().unwrap_or_default();
        let total = PipelineState::PHASES.len();
        self.operator
            .notice(Notice::Phase, &format!("[{step}/{total}] {title}"));
    }

    fn setup(&mut self) -> Result<DeployConfig, PhaseError> {
        let default_locator;
        let locator = match &self.locator {
            Some(locator) => locator,
            None => {
                default_locator = ToolchainLocator::new(self.runner.clone(), self.platform);
                &default_locator
            }
        };
        let config = Setup::new(&self.store, self.platform, locator, &self.server_candidates)
            .with_reuse(self.reuse)
            .run(&mut *self.operator)?;
        Ok(config)
    }

    fn build(&mut self, config: &DeployConfig) -> Result<BuildReport, PhaseError> {
        let report = Builder::new(self.runner.clone(), self.platform).build(config)?;
        if report.classpath.entries.is_empty() {
            self.operator.notice(
                Notice::Warning,
                "No server libraries found; compiling with '.' as classpath",
            );
        }
        self.operator.notice(
            Notice::Success,
            &format!(
                "Compiled {} source file(s) into {}",
                report.sources,
                report.artifact.display()
            ),
        );
        Ok(report)
    }

    fn process_manager(&self) -> ProcessManager {
        let inspector = self
            .inspector
            .clone()
            .unwrap_or_else(|| inspector_for(self.platform, self.runner.clone()));
        ProcessManager::new(inspector, self.launcher.clone(), self.platform)
            .with_port(self.settings.port)
            .with_exit_wait(self.settings.process_exit_timeout, self.settings.poll_interval)
            .with_wrapper_cleanup_delay(self.settings.wrapper_cleanup_delay)
    }

    fn deploy(
        &mut self,
        config: &DeployConfig,
        manager: &ProcessManager,
    ) -> Result<(Option<ShellWindow>, TerminationReport, DeployReport), PhaseError> {
        let extension_dir = config.extension_dir(self.platform);
        prepare_extension_dir(&extension_dir)?;

        let window = manager.discover_window();
        if let Some(window) = &window {
            self.operator.notice(
                Notice::Info,
                &format!("Server is running in window {} ({})", window.pid, window.name),
            );
        }

        let termination = manager.terminate_listeners();
        if termination.skipped {
            self.operator.notice(
                Notice::Warning,
                "Stopping the running server is not supported on this platform",
            );
        }
        for (pid, reason) in &termination.failed {
            self.operator
                .notice(Notice::Warning, &format!("Could not stop process {pid}: {reason}"));
        }
        if !termination.still_running.is_empty() {
            self.operator.notice(
                Notice::Warning,
                &format!("Processes still running: {:?}", termination.still_running),
            );
        }

        let transfer = deploy_artifact(
            &config.artifact_path(),
            &extension_dir,
            &config.json_files(),
            self.settings.transfer(),
        )?;
        for warning in &transfer.warnings {
            self.operator.notice(Notice::Warning, warning);
        }
        self.operator.notice(
            Notice::Success,
            &format!("Deployed {}", transfer.deployed.display()),
        );

        Ok((window, termination, transfer))
    }

    fn restart(
        &mut self,
        config: &DeployConfig,
        manager: &ProcessManager,
        window: Option<&ShellWindow>,
    ) -> Result<RelaunchReport, RestartError> {
        let report = manager.relaunch(&config.server(self.platform), window)?;
        if let Some(pid) = report.closed_window {
            self.operator
                .notice(Notice::Info, &format!("Closed previous server window ({pid})"));
        }
        self.operator
            .notice(Notice::Success, "Server started in a new terminal window");
        Ok(report)
    }

    fn cleanup(&mut self, config: &DeployConfig) -> CleanupReport {
        let report = cleanup_source_tree(&config.source_root);
        if report.failure_count() > 0 {
            self.operator.notice(
                Notice::Warning,
                &format!("{} file(s) could not be removed", report.failure_count()),
            );
        }
        tracing::info!(
            classes = report.classes_removed,
            archives = report.archives_removed.len(),
            failures = report.failure_count(),
            "cleanup finished"
        );
        report
    }
}
