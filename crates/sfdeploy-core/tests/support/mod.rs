//! Fakes for the pipeline seams, shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::TempDir;

use sfdeploy_core::exec::{CommandOutput, CommandRunner, CommandSpec};
use sfdeploy_core::process::{ProcessInfo, ProcessInspector, TerminalLauncher};
use sfdeploy_core::prompt::{Notice, Operator};

/// Operator answering from queues; errors once a queue runs dry.
#[derive(Default)]
pub struct ScriptedOperator {
    pub inputs: VecDeque<String>,
    pub confirms: VecDeque<bool>,
    pub notices: Vec<(Notice, String)>,
}

impl ScriptedOperator {
    pub fn with_inputs<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn messages(&self, level: Notice) -> Vec<&str> {
        self.notices
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }
}

impl Operator for ScriptedOperator {
    fn input(&mut self, prompt: &str) -> anyhow::Result<String> {
        self.inputs
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("unexpected prompt: {prompt}"))
    }

    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        self.confirms
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("unexpected confirmation: {prompt}"))
    }

    fn notice(&mut self, level: Notice, message: &str) {
        self.notices.push((level, message.to_string()));
    }
}

/// Stands in for the JDK: `javac` writes a `.class` per source, `jar` writes the archive.
#[derive(Default)]
pub struct FakeJdk {
    pub calls: Mutex<Vec<CommandSpec>>,
    pub compile_error: Option<String>,
}

impl FakeJdk {
    pub fn failing(message: &str) -> Self {
        Self {
            compile_error: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(CommandSpec::program_name)
            .collect()
    }
}

impl CommandRunner for FakeJdk {
    fn run(&self, spec: &CommandSpec) -> anyhow::Result<CommandOutput> {
        self.calls.lock().unwrap().push(spec.clone());
        match spec.program_name().as_str() {
            "javac" if spec.args == ["-version"] => Ok(CommandOutput::ok("javac 11.0.2")),
            "javac" => {
                if let Some(message) = &self.compile_error {
                    return Ok(CommandOutput::failed(message.clone()));
                }
                for source in spec.args.iter().filter(|a| a.ends_with(".java")) {
                    fs::write(Path::new(source).with_extension("class"), "compiled")?;
                }
                Ok(CommandOutput::ok(""))
            }
            "jar" => {
                fs::write(&spec.args[1], "PK")?;
                Ok(CommandOutput::ok(""))
            }
            _ => Ok(CommandOutput::failed("command not available")),
        }
    }
}

/// In-memory process table.
#[derive(Default)]
pub struct FakeInspector {
    pub listeners: Vec<u32>,
    pub parents: Vec<(u32, ProcessInfo)>,
    pub alive: Mutex<Vec<u32>>,
    pub terminated: Mutex<Vec<u32>>,
}

impl ProcessInspector for FakeInspector {
    fn list_listening_processes_on_port(&self, _port: u16) -> anyhow::Result<Vec<u32>> {
        Ok(self.listeners.clone())
    }

    fn find_parent_process(&self, pid: u32) -> anyhow::Result<Option<ProcessInfo>> {
        Ok(self
            .parents
            .iter()
            .find(|(child, _)| *child == pid)
            .map(|(_, parent)| parent.clone()))
    }

    fn is_process_alive(&self, pid: u32) -> bool {
        self.alive.lock().unwrap().contains(&pid)
    }

    fn terminate(&self, pid: u32) -> anyhow::Result<()> {
        self.terminated.lock().unwrap().push(pid);
        self.alive.lock().unwrap().retain(|p| *p != pid);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingLauncher {
    pub launched: Mutex<Vec<CommandSpec>>,
}

impl TerminalLauncher for RecordingLauncher {
    fn launch(&self, spec: &CommandSpec) -> std::io::Result<()> {
        self.launched.lock().unwrap().push(spec.clone());
        Ok(())
    }
}

/// A source project, a server install and a JDK directory under one temp dir.
pub struct Workspace {
    pub temp: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let ws = Self { temp };
        ws.write("game/src/com/example/GameExtension.java", "public class GameExtension {}");
        ws.write("server/SFS2X/sfs2x.sh", "#!/bin/sh\n");
        ws.write("server/SFS2X/lib/sfs2x.jar", "");
        ws.write("server/SFS2X/lib/sfs2x-core.jar", "");
        ws.write("jdk/bin/javac", "");
        ws.write("jdk/bin/jar", "");
        ws
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.temp.path().join(rel)
    }

    pub fn arg(&self, rel: &str) -> String {
        self.path(rel).to_string_lossy().to_string()
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn source(&self) -> PathBuf {
        self.path("game")
    }

    pub fn server(&self) -> PathBuf {
        self.path("server")
    }

    pub fn jdk(&self) -> PathBuf {
        self.path("jdk/bin")
    }

    pub fn config_path(&self) -> PathBuf {
        self.path("sfdeploy_config.json")
    }
}

/// File names directly inside `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
