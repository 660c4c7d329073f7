//! Sequencing of discovery, termination and relaunch.

use std::sync::Arc;
use std::time::Duration;

use crate::error::RestartError;
use crate::layout::{SERVER_PORT, ServerLayout};
use crate::platform::{Platform, ProcessControl};
use crate::wait::poll_until;

use super::launcher::{WRAPPER_CLEANUP_DELAY, schedule_removal, write_wrapper};
use super::{ProcessInfo, ProcessInspector, ShellWindow, TerminalLauncher};

pub const PROCESS_EXIT_TIMEOUT: Duration = Duration::from_secs(10);
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);
/// Parent links followed before an ancestry walk gives up.
const MAX_ANCESTRY: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminationReport {
    pub terminated: Vec<u32>,
    pub failed: Vec<(u32, String)>,
    /// Pids still alive when the exit wait timed out.
    pub still_running: Vec<u32>,
    /// Process control is unavailable on this platform; nothing was attempted.
    pub skipped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaunchReport {
    pub wrapper: std::path::PathBuf,
    /// Pid of the previous window, if it was still open and got closed.
    pub closed_window: Option<u32>,
}

pub struct ProcessManager {
    inspector: Arc<dyn ProcessInspector>,
    launcher: Arc<dyn TerminalLauncher>,
    platform: Platform,
    port: u16,
    exit_timeout: Duration,
    poll_interval: Duration,
    wrapper_cleanup_delay: Duration,
    own_pid: u32,
}

impl ProcessManager {
    pub fn new(
        inspector: Arc<dyn ProcessInspector>,
        launcher: Arc<dyn TerminalLauncher>,
        platform: Platform,
    ) -> Self {
        Self {
            inspector,
            launcher,
            platform,
            port: SERVER_PORT,
            exit_timeout: PROCESS_EXIT_TIMEOUT,
            poll_interval: POLL_INTERVAL,
            wrapper_cleanup_delay: WRAPPER_CLEANUP_DELAY,
            own_pid: std::process::id(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_exit_wait(mut self, timeout: Duration, interval: Duration) -> Self {
        self.exit_timeout = timeout;
        self.poll_interval = interval;
        self
    }

    pub fn with_wrapper_cleanup_delay(mut self, delay: Duration) -> Self {
        self.wrapper_cleanup_delay = delay;
        self
    }

    /// Pid whose ancestors are never reported as the server window.
    pub fn with_own_pid(mut self, pid: u32) -> Self {
        self.own_pid = pid;
        self
    }

    fn supported(&self) -> bool {
        match self.platform.process_control() {
            ProcessControl::Native => true,
            ProcessControl::Unsupported => {
                tracing::warn!(os = ?self.platform.os(), "process control is not supported on this platform");
                false
            }
        }
    }

    /// Find the terminal window hosting the current listener on the server port.
    ///
    /// Walks up from each listener: an ancestor whose command line runs the
    /// relaunch wrapper wins, otherwise the outermost shell directly above the
    /// server. Our own process and its ancestors are never reported.
    pub fn discover_window(&self) -> Option<ShellWindow> {
        if !self.supported() {
            return None;
        }
        let pids = match self.inspector.list_listening_processes_on_port(self.port) {
            Ok(pids) => pids,
            Err(err) => {
                tracing::warn!(port = self.port, error = %err, "could not list listeners");
                return None;
            }
        };

        let mut protected = vec![self.own_pid];
        protected.extend(self.ancestors(self.own_pid).iter().map(|p| p.pid));

        for pid in pids {
            if let Some(window) = self.window_above(pid, &protected) {
                tracing::debug!(server = pid, window = window.pid, name = %window.name, "found server window");
                return Some(window);
            }
        }
        None
    }

    fn window_above(&self, pid: u32, protected: &[u32]) -> Option<ShellWindow> {
        let wrapper = self.platform.wrapper_script().to_ascii_lowercase();
        let shells = self.platform.shell_names();
        let mut outermost_shell = None;

        for process in self.ancestors(pid) {
            let runs_wrapper = process.command.to_ascii_lowercase().contains(&wrapper);
            if !runs_wrapper && !shells.iter().any(|s| s.eq_ignore_ascii_case(&process.name)) {
                break;
            }
            if protected.contains(&process.pid) {
                tracing::debug!(server = pid, pid = process.pid, "server shares our shell; not closing it");
                return None;
            }
            if runs_wrapper {
                return Some(window_of(process));
            }
            outermost_shell = Some(process);
        }
        outermost_shell.map(window_of)
    }

    /// Parent chain of `pid`, nearest first.
    fn ancestors(&self, pid: u32) -> Vec<ProcessInfo> {
        let mut chain: Vec<ProcessInfo> = Vec::new();
        let mut current = pid;
        while chain.len() < MAX_ANCESTRY {
            match self.inspector.find_parent_process(current) {
                Ok(Some(parent))
                    if parent.pid != current
                        && parent.pid != pid
                        && !chain.iter().any(|p| p.pid == parent.pid) =>
                {
                    current = parent.pid;
                    chain.push(parent);
                }
                Ok(_) => break,
                Err(err) => {
                    tracing::debug!(pid = current, error = %err, "parent lookup failed");
                    break;
                }
            }
        }
        chain
    }

    /// Force-terminate every listener on the server port and wait for them to exit.
    pub fn terminate_listeners(&self) -> TerminationReport {
        let mut report = TerminationReport::default();
        if !self.supported() {
            report.skipped = true;
            return report;
        }

        let pids = self
            .inspector
            .list_listening_processes_on_port(self.port)
            .unwrap_or_else(|err| {
                tracing::warn!(port = self.port, error = %err, "could not list listeners");
                Vec::new()
            });

        for pid in pids {
            match self.inspector.terminate(pid) {
                Ok(()) => {
                    tracing::info!(pid, "terminated server process");
                    report.terminated.push(pid);
                }
                Err(err) => {
                    tracing::warn!(pid, error = %err, "could not terminate process");
                    report.failed.push((pid, format!("{err:#}")));
                }
            }
        }

        if !report.terminated.is_empty() {
            let exited = poll_until(self.exit_timeout, self.poll_interval, || {
                report.terminated.iter().all(|pid| !self.inspector.is_process_alive(*pid))
            });
            if !exited {
                report.still_running = report
                    .terminated
                    .iter()
                    .copied()
                    .filter(|pid| self.inspector.is_process_alive(*pid))
                    .collect();
                tracing::warn!(pids = ?report.still_running, "processes still running after wait");
            }
        }
        report
    }

    /// Open a fresh terminal running the server, closing `previous` first if still open.
    pub fn relaunch(
        &self,
        layout: &ServerLayout,
        previous: Option<&ShellWindow>,
    ) -> Result<RelaunchReport, RestartError> {
        let mut closed_window = None;
        if let Some(window) = previous
            && self.platform.process_control() == ProcessControl::Native
            && self.inspector.is_process_alive(window.pid)
        {
            match self.inspector.terminate(window.pid) {
                Ok(()) => closed_window = Some(window.pid),
                Err(err) => tracing::warn!(pid = window.pid, error = %err, "could not close previous window"),
            }
        }

        let wrapper = write_wrapper(self.platform, layout)?;
        let command = self.platform.terminal_command(&wrapper);
        if let Err(err) = self.launcher.launch(&command) {
            let _ = std::fs::remove_file(&wrapper);
            return Err(RestartError::Spawn(err));
        }
        tracing::info!(wrapper = %wrapper.display(), "server terminal launched");

        schedule_removal(wrapper.clone(), self.wrapper_cleanup_delay);
        Ok(RelaunchReport {
            wrapper,
            closed_window,
        })
    }
}

fn window_of(process: ProcessInfo) -> ShellWindow {
    ShellWindow {
        pid: process.pid,
        name: process.name,
    }
}
