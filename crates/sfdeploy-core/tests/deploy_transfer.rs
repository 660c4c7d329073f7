mod support;

use std::time::Duration;

use sfdeploy_core::deploy::{
    TransferOptions, cleanup_source_tree, deploy_artifact, prepare_extension_dir,
};
use sfdeploy_core::error::DeployError;

use support::{Workspace, file_names};

fn no_retry() -> TransferOptions {
    TransferOptions {
        lock_retry_attempts: 1,
        lock_retry_interval: Duration::ZERO,
    }
}

#[test]
fn old_archive_is_replaced_by_the_new_one() {
    let ws = Workspace::new();
    ws.write("game/ServerExtension.jar", "new build");
    ws.write("server/SFS2X/extensions/Game/old.jar", "old build");
    let extension_dir = ws.path("server/SFS2X/extensions/Game");

    prepare_extension_dir(&extension_dir).unwrap();
    let report = deploy_artifact(
        &ws.path("game/ServerExtension.jar"),
        &extension_dir,
        &[],
        no_retry(),
    )
    .unwrap();

    assert_eq!(file_names(&extension_dir), vec!["ServerExtension.jar"]);
    assert_eq!(report.removed_archives, vec![extension_dir.join("old.jar")]);
    assert_eq!(
        std::fs::read_to_string(extension_dir.join("ServerExtension.jar")).unwrap(),
        "new build"
    );
    assert!(report.warnings.is_empty());
}

#[test]
fn non_archive_files_in_extension_dir_are_kept() {
    let ws = Workspace::new();
    ws.write("game/ServerExtension.jar", "new build");
    ws.write("server/SFS2X/extensions/Game/config.properties", "x=1");
    let extension_dir = ws.path("server/SFS2X/extensions/Game");

    deploy_artifact(&ws.path("game/ServerExtension.jar"), &extension_dir, &[], no_retry()).unwrap();

    assert_eq!(
        file_names(&extension_dir),
        vec!["ServerExtension.jar", "config.properties"]
    );
}

#[test]
fn extension_dir_under_a_file_cannot_be_created() {
    let ws = Workspace::new();
    ws.write("server/SFS2X/extensions", "not a directory");

    let err = prepare_extension_dir(&ws.path("server/SFS2X/extensions/Game")).unwrap_err();

    assert!(matches!(err, DeployError::CreateDir { .. }));
}

#[test]
fn cleanup_removes_byproducts_and_is_idempotent() {
    let ws = Workspace::new();
    ws.write("game/src/com/example/GameExtension.class", "");
    ws.write("game/src/Util.class", "");
    ws.write("game/ServerExtension.jar", "");

    let first = cleanup_source_tree(&ws.source());
    assert_eq!(first.classes_removed, 2);
    assert_eq!(first.archives_removed, vec![ws.path("game/ServerExtension.jar")]);
    assert!(first.failures.is_empty());
    assert!(ws.path("game/src/com/example/GameExtension.java").exists());

    let second = cleanup_source_tree(&ws.source());
    assert_eq!(second.classes_removed, 0);
    assert!(second.archives_removed.is_empty());
    assert_eq!(second.failure_count(), 0);
}

#[test]
fn cleanup_of_missing_tree_reports_nothing() {
    let ws = Workspace::new();
    let report = cleanup_source_tree(&ws.path("nowhere"));
    assert_eq!(report.classes_removed, 0);
    assert!(report.failures.is_empty());
}
