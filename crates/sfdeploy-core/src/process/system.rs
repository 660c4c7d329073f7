//! Native [`ProcessInspector`] over the `sysinfo` process table.
//!
//! Only the port-listener query shells out (`netstat` on Windows, `lsof`
//! elsewhere); parent lookup, liveness and termination read the table directly.

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::bail;
use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System, UpdateKind};

use crate::exec::CommandRunner;
use crate::platform::{Os, Platform};

use super::{ProcessInfo, ProcessInspector, unix, windows};

pub struct SystemInspector {
    runner: Arc<dyn CommandRunner>,
    platform: Platform,
    system: Mutex<System>,
}

impl SystemInspector {
    pub fn new(runner: Arc<dyn CommandRunner>, platform: Platform) -> Self {
        Self {
            runner,
            platform,
            system: Mutex::new(System::new()),
        }
    }

    /// Refresh a single pid and hand its entry, if any, to `read`.
    fn with_process<T>(&self, pid: u32, read: impl FnOnce(Option<&Process>) -> T) -> T {
        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        let pid = Pid::from_u32(pid);
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_cmd(UpdateKind::Always),
        );
        read(system.process(pid))
    }
}

fn describe(pid: u32, process: &Process) -> ProcessInfo {
    let command = process
        .cmd()
        .iter()
        .map(|arg| arg.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    ProcessInfo::new(pid, process.name().to_string_lossy()).with_command(command)
}

impl ProcessInspector for SystemInspector {
    fn list_listening_processes_on_port(&self, port: u16) -> anyhow::Result<Vec<u32>> {
        match self.platform.os() {
            Os::Windows => windows::listening_pids(&*self.runner, port),
            Os::MacOs | Os::Linux | Os::Other => unix::listening_pids(&*self.runner, port),
        }
    }

    fn find_parent_process(&self, pid: u32) -> anyhow::Result<Option<ProcessInfo>> {
        let Some(parent) = self.with_process(pid, |p| p.and_then(Process::parent)) else {
            return Ok(None);
        };
        let parent = parent.as_u32();
        if parent == 0 {
            return Ok(None);
        }
        Ok(self.with_process(parent, |p| p.map(|p| describe(parent, p))))
    }

    fn is_process_alive(&self, pid: u32) -> bool {
        self.with_process(pid, |p| p.is_some_and(|p| p.status() != ProcessStatus::Zombie))
    }

    fn terminate(&self, pid: u32) -> anyhow::Result<()> {
        match self.with_process(pid, |p| p.map(Process::kill)) {
            // already gone
            None => Ok(()),
            Some(true) => Ok(()),
            Some(false) => bail!("could not kill process {pid}"),
        }
    }
}
