//! Relaunch wrapper script and detached terminal spawning.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::RestartError;
use crate::exec::CommandSpec;
use crate::layout::ServerLayout;
use crate::platform::Platform;

/// How long the wrapper script is kept after the terminal was spawned.
///
/// Nothing signals when the terminal has finished reading the script, so
/// this is a heuristic; too short a value can delete it before it is read.
pub const WRAPPER_CLEANUP_DELAY: Duration = Duration::from_secs(5);

const WINDOW_TITLE: &str = "SmartFoxServer 2X";

/// Opens a new terminal window running a command, without waiting for it.
pub trait TerminalLauncher: Send + Sync {
    fn launch(&self, spec: &CommandSpec) -> std::io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

/// `CREATE_NEW_PROCESS_GROUP`: Ctrl+C in our console must not reach the server.
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

impl TerminalLauncher for SystemLauncher {
    /// Spawns `spec` in its own process group so it outlives our console.
    fn launch(&self, spec: &CommandSpec) -> std::io::Result<()> {
        tracing::debug!(program = %spec.program.display(), args = ?spec.args, "spawning terminal");
        let mut command = spec.to_command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(CREATE_NEW_PROCESS_GROUP);
        }
        command.spawn().map(drop)
    }
}

/// Script contents that enter the server directory, run the launcher and
/// keep the window open once the server stops.
pub fn render_wrapper(platform: Platform, layout: &ServerLayout) -> String {
    let server_dir = layout.server_dir();
    let launcher = layout.launcher();
    if platform.is_windows() {
        format!(
            "@echo off\r\n\
             title {title}\r\n\
             cd /d \"{dir}\"\r\n\
             call \"{launcher}\"\r\n\
             echo.\r\n\
             echo Server stopped.\r\n\
             pause\r\n",
            title = WINDOW_TITLE,
            dir = server_dir.display(),
            launcher = launcher.display(),
        )
    } else {
        format!(
            "#!/bin/sh\n\
             printf '\\033]0;{title}\\007'\n\
             cd \"{dir}\" || exit 1\n\
             sh \"{launcher}\"\n\
             echo\n\
             echo \"Server stopped.\"\n\
             printf 'Press Enter to close...'\n\
             read _\n",
            title = WINDOW_TITLE,
            dir = shell_escape(&server_dir),
            launcher = shell_escape(&launcher),
        )
    }
}

/// Write the wrapper into the target root and return its path.
pub fn write_wrapper(platform: Platform, layout: &ServerLayout) -> Result<PathBuf, RestartError> {
    let path = layout.wrapper_script();
    let to_error = |source| RestartError::WrapperScript {
        path: path.clone(),
        source,
    };
    std::fs::write(&path, render_wrapper(platform, layout)).map_err(to_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).map_err(to_error)?;
    }

    Ok(path)
}

/// Delete `path` after `delay` on a background thread. Errors are logged.
pub fn schedule_removal(path: PathBuf, delay: Duration) -> JoinHandle<()> {
    thread::spawn(move || {
        thread::sleep(delay);
        if let Err(err) = std::fs::remove_file(&path)
            && err.kind() != std::io::ErrorKind::NotFound
        {
            tracing::warn!(path = %path.display(), error = %err, "could not remove launch script");
        }
    })
}

fn shell_escape(path: &Path) -> String {
    path.display()
        .to_string()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
        .replace('`', "\\`")
}
