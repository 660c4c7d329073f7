//! Discovery, termination and relaunch of the running server.
//!
//! OS-specific introspection lives behind [`ProcessInspector`]; the
//! [`ProcessManager`] only sequences inspector and launcher calls.

pub mod launcher;
pub mod manager;
pub mod system;
pub mod unix;
pub mod windows;

use std::sync::Arc;

use crate::exec::CommandRunner;
use crate::platform::Platform;

pub use launcher::{SystemLauncher, TerminalLauncher, WRAPPER_CLEANUP_DELAY};
pub use manager::{ProcessManager, RelaunchReport, TerminationReport};
pub use system::SystemInspector;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    /// Full command line, arguments joined by spaces. Empty when unreadable.
    pub command: String,
}

impl ProcessInfo {
    pub fn new(pid: u32, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: name.into(),
            command: String::new(),
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }
}

/// The terminal window that hosted the previous server instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellWindow {
    pub pid: u32,
    pub name: String,
}

/// Read-and-kill access to the OS process table.
///
/// Lookups are best-effort: a missing tool or unparseable output yields an
/// empty answer rather than an error wherever that is meaningful.
pub trait ProcessInspector: Send + Sync {
    /// Pids of processes with a listening TCP socket on `port`, without duplicates.
    fn list_listening_processes_on_port(&self, port: u16) -> anyhow::Result<Vec<u32>>;

    fn find_parent_process(&self, pid: u32) -> anyhow::Result<Option<ProcessInfo>>;

    fn is_process_alive(&self, pid: u32) -> bool;

    /// Forcefully terminate `pid`.
    fn terminate(&self, pid: u32) -> anyhow::Result<()>;
}

/// Native inspector for `platform`; `runner` serves the listener query.
pub fn inspector_for(platform: Platform, runner: Arc<dyn CommandRunner>) -> Arc<dyn ProcessInspector> {
    Arc::new(SystemInspector::new(runner, platform))
}
