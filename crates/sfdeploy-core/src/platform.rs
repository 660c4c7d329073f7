//! Platform capabilities.
//!
//! Everything that differs between operating systems (executable suffixes,
//! classpath separators, launcher scripts, terminal spawning, process control)
//! is answered here so the rest of the crate never branches on `cfg!` itself.

use std::path::{Path, PathBuf};

use crate::exec::{CommandSpec, path_arg};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Windows,
    MacOs,
    Linux,
    Other,
}

/// Whether processes can be discovered and terminated on this platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessControl {
    /// Discovery and termination are implemented with native OS utilities.
    Native,
    /// No implementation exists; discovery and termination are skipped with a warning.
    Unsupported,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    os: Os,
}

impl Platform {
    pub const fn new(os: Os) -> Self {
        Self { os }
    }

    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        let os = if cfg!(target_os = "windows") {
            Os::Windows
        } else if cfg!(target_os = "macos") {
            Os::MacOs
        } else if cfg!(target_os = "linux") {
            Os::Linux
        } else {
            Os::Other
        };
        Self::new(os)
    }

    pub fn os(&self) -> Os {
        self.os
    }

    pub fn is_windows(&self) -> bool {
        self.os == Os::Windows
    }

    pub fn exe_suffix(&self) -> &'static str {
        if self.is_windows() { ".exe" } else { "" }
    }

    /// Path of the executable `name` inside `dir`, with the platform suffix.
    pub fn executable(&self, dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{}{}", name, self.exe_suffix()))
    }

    pub fn classpath_separator(&self) -> &'static str {
        if self.is_windows() { ";" } else { ":" }
    }

    /// File name of the server launcher inside the server directory.
    pub fn launcher_script(&self) -> &'static str {
        if self.is_windows() {
            "sfs2x.bat"
        } else {
            "sfs2x.sh"
        }
    }

    /// File name of the generated relaunch wrapper.
    pub fn wrapper_script(&self) -> &'static str {
        if self.is_windows() {
            "sfs_with_logs.bat"
        } else {
            "sfs_with_logs.sh"
        }
    }

    pub fn process_control(&self) -> ProcessControl {
        match self.os {
            Os::Windows | Os::MacOs | Os::Linux => ProcessControl::Native,
            Os::Other => ProcessControl::Unsupported,
        }
    }

    /// Process names that count as a terminal/shell window hosting the server.
    pub fn shell_names(&self) -> &'static [&'static str] {
        match self.os {
            Os::Windows => &["cmd.exe"],
            _ => &["sh", "bash", "zsh", "fish", "dash", "ksh"],
        }
    }

    /// Well-known JDK 11 install locations, as glob patterns matching `javac`.
    pub fn toolchain_globs(&self) -> Vec<String> {
        let patterns: &[&str] = match self.os {
            Os::Windows => &[
                "C:\\Program Files\\Eclipse Adoptium\\jdk-11*\\bin\\javac.exe",
                "C:\\Program Files\\Java\\jdk-11*\\bin\\javac.exe",
                "C:\\Program Files\\OpenJDK\\jdk-11*\\bin\\javac.exe",
                "C:\\Program Files (x86)\\Eclipse Adoptium\\jdk-11*\\bin\\javac.exe",
            ],
            Os::MacOs => &[
                "/Library/Java/JavaVirtualMachines/*11*/Contents/Home/bin/javac",
                "/opt/homebrew/opt/openjdk@11/bin/javac",
                "/usr/local/opt/openjdk@11/bin/javac",
            ],
            Os::Linux => &[
                "/usr/lib/jvm/java-11*/bin/javac",
                "/usr/lib/jvm/*-11*/bin/javac",
                "/opt/java/jdk-11*/bin/javac",
            ],
            Os::Other => &[],
        };
        patterns.iter().map(|p| p.to_string()).collect()
    }

    /// Command that opens a new, detached terminal window running `wrapper`.
    pub fn terminal_command(&self, wrapper: &Path) -> CommandSpec {
        let dir = wrapper
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let spec = match self.os {
            Os::Windows => CommandSpec::new("cmd").args(["/c", "start", "cmd", "/k"]),
            Os::MacOs => CommandSpec::new("open").args(["-a", "Terminal"]),
            Os::Linux | Os::Other => {
                CommandSpec::new("x-terminal-emulator").args(["-e", "sh"])
            }
        };
        spec.arg(path_arg(wrapper)).current_dir(dir)
    }
}
