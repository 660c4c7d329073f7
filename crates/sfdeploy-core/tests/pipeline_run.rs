mod support;

use std::sync::{Arc, Mutex};

use sfdeploy_core::config::{ConfigStore, DeployConfig, parse_config};
use sfdeploy_core::error::ErrorKind;
use sfdeploy_core::pipeline::{DeploymentPipeline, PipelineSettings, PipelineState};
use sfdeploy_core::platform::{Os, Platform};
use sfdeploy_core::process::{ProcessInfo, ShellWindow};
use sfdeploy_core::setup::ReusePolicy;
use sfdeploy_core::toolchain::ToolchainLocator;
use std::time::Duration;

use support::{FakeInspector, FakeJdk, RecordingLauncher, ScriptedOperator, Workspace, file_names};

const LINUX: Platform = Platform::new(Os::Linux);

fn instant_settings() -> PipelineSettings {
    PipelineSettings {
        process_exit_timeout: Duration::ZERO,
        poll_interval: Duration::ZERO,
        lock_retry_attempts: 1,
        lock_retry_interval: Duration::ZERO,
        wrapper_cleanup_delay: Duration::from_secs(30),
        ..Default::default()
    }
}

fn locator(ws: &Workspace, jdk: Arc<FakeJdk>) -> ToolchainLocator {
    let javac = ws.jdk().join("javac");
    ToolchainLocator::new(jdk, LINUX)
        .with_java_home(None)
        .with_path_lookup(move |_| Some(javac.clone()))
        .with_glob_patterns(Vec::new())
}

fn save_config(ws: &Workspace) -> DeployConfig {
    let config = DeployConfig::new(ws.source(), ws.server(), "Game").with_toolchain(ws.jdk());
    ConfigStore::from_path(ws.config_path()).save(&config).unwrap();
    config
}

#[test]
fn saved_configuration_runs_every_phase() {
    let ws = Workspace::new();
    ws.write("server/SFS2X/extensions/Game/old.jar", "stale");
    save_config(&ws);

    let jdk = Arc::new(FakeJdk::default());
    let inspector = Arc::new(FakeInspector {
        listeners: vec![4321],
        parents: vec![(4321, ProcessInfo::new(900, "bash").with_command("bash ./sfs2x.sh"))],
        alive: Mutex::new(vec![4321, 900]),
        ..Default::default()
    });
    let launcher = Arc::new(RecordingLauncher::default());
    let mut operator = ScriptedOperator::default();

    let summary = DeploymentPipeline::new(&mut operator, ConfigStore::from_path(ws.config_path()), LINUX)
        .with_runner(jdk.clone())
        .with_inspector(inspector.clone())
        .with_launcher(launcher.clone())
        .with_locator(locator(&ws, jdk.clone()))
        .with_server_candidates(Vec::new())
        .with_settings(instant_settings())
        .with_reuse(ReusePolicy::Always)
        .run()
        .unwrap();

    assert_eq!(
        summary.transitions,
        vec![
            PipelineState::Setup,
            PipelineState::Build,
            PipelineState::Deploy,
            PipelineState::Restart,
            PipelineState::Cleanup,
            PipelineState::Done,
        ]
    );
    assert_eq!(jdk.programs(), vec!["javac", "javac", "jar"]);

    let extension_dir = ws.path("server/SFS2X/extensions/Game");
    assert_eq!(file_names(&extension_dir), vec!["ServerExtension.jar"]);

    assert_eq!(summary.window, Some(ShellWindow { pid: 900, name: "bash".to_string() }));
    assert_eq!(*inspector.terminated.lock().unwrap(), vec![4321, 900]);
    assert_eq!(summary.relaunch.closed_window, Some(900));

    let launched = launcher.launched.lock().unwrap();
    assert_eq!(launched.len(), 1);
    assert_eq!(launched[0].program_name(), "x-terminal-emulator");
    assert_eq!(launched[0].cwd.as_deref(), Some(ws.server().as_path()));

    assert_eq!(summary.cleanup.classes_removed, 1);
    assert_eq!(summary.cleanup.archives_removed.len(), 1);
    assert!(!ws.path("game/ServerExtension.jar").exists());
    assert!(!ws.path("game/src/com/example/GameExtension.class").exists());
    assert!(operator.messages(sfdeploy_core::prompt::Notice::Success).contains(&"Deployment complete"));
}

#[test]
fn compile_failure_aborts_before_touching_the_server() {
    let ws = Workspace::new();
    save_config(&ws);

    let jdk = Arc::new(FakeJdk::failing("GameExtension.java:1: error: ';' expected"));
    let inspector = Arc::new(FakeInspector {
        listeners: vec![4321],
        ..Default::default()
    });
    let launcher = Arc::new(RecordingLauncher::default());
    let mut operator = ScriptedOperator::default();

    let failure = DeploymentPipeline::new(&mut operator, ConfigStore::from_path(ws.config_path()), LINUX)
        .with_runner(jdk.clone())
        .with_inspector(inspector.clone())
        .with_launcher(launcher.clone())
        .with_locator(locator(&ws, jdk.clone()))
        .with_server_candidates(Vec::new())
        .with_settings(instant_settings())
        .with_reuse(ReusePolicy::Always)
        .run()
        .unwrap_err();

    assert_eq!(failure.state, PipelineState::Build);
    assert_eq!(failure.error.kind(), ErrorKind::Build);
    assert!(failure.error.to_string().contains("';' expected"));
    assert_eq!(
        failure.transitions,
        vec![PipelineState::Setup, PipelineState::Build, PipelineState::Aborted]
    );
    assert!(inspector.terminated.lock().unwrap().is_empty());
    assert!(launcher.launched.lock().unwrap().is_empty());
    assert!(!ws.path("server/SFS2X/extensions/Game").exists());
}

#[test]
fn first_run_collects_and_saves_configuration() {
    let ws = Workspace::new();
    let jdk = Arc::new(FakeJdk::default());
    let mut operator = ScriptedOperator::with_inputs([
        ws.arg("game"),
        ws.arg("server"),
        "bad/name".to_string(),
        "Game".to_string(),
    ]);

    let summary = DeploymentPipeline::new(&mut operator, ConfigStore::from_path(ws.config_path()), LINUX)
        .with_runner(jdk.clone())
        .with_inspector(Arc::new(FakeInspector::default()))
        .with_launcher(Arc::new(RecordingLauncher::default()))
        .with_locator(locator(&ws, jdk.clone()))
        .with_server_candidates(Vec::new())
        .with_settings(instant_settings())
        .run()
        .unwrap();

    let saved = parse_config(&ws.config_path()).unwrap();
    assert_eq!(saved, summary.config);
    assert_eq!(saved.extension_name, "Game");
    assert_eq!(saved.toolchain_path, ws.jdk());
    assert_eq!(jdk.programs(), vec!["javac", "javac", "jar"]);
    assert_eq!(operator.messages(sfdeploy_core::prompt::Notice::Error).len(), 1);
}

#[test]
fn configured_data_files_are_deployed_with_the_archive() {
    let ws = Workspace::new();
    ws.write("data/items.json", "{\"items\": []}");
    let mut config = DeployConfig::new(ws.source(), ws.server(), "Game").with_toolchain(ws.jdk());
    config.json_source_dir = Some(ws.path("data"));
    config.deploy_json_files = vec!["items.json".to_string(), "missing.json".to_string()];
    ConfigStore::from_path(ws.config_path()).save(&config).unwrap();

    let jdk = Arc::new(FakeJdk::default());
    let mut operator = ScriptedOperator {
        confirms: [true].into_iter().collect(),
        ..Default::default()
    };

    let summary = DeploymentPipeline::new(&mut operator, ConfigStore::from_path(ws.config_path()), LINUX)
        .with_runner(jdk.clone())
        .with_inspector(Arc::new(FakeInspector::default()))
        .with_launcher(Arc::new(RecordingLauncher::default()))
        .with_locator(locator(&ws, jdk))
        .with_server_candidates(Vec::new())
        .with_settings(instant_settings())
        .run()
        .unwrap();

    assert_eq!(
        file_names(&ws.path("server/SFS2X/extensions/Game")),
        vec!["ServerExtension.jar", "items.json"]
    );
    assert_eq!(summary.transfer.warnings.len(), 1);
    assert!(
        operator
            .messages(sfdeploy_core::prompt::Notice::Warning)
            .iter()
            .any(|m| m.contains("missing.json"))
    );
}
