// tests/fork_launcher.rs
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, write_script};

use std::path::Path;
use std::time::Duration;

use forkseed::config::{ConfigFile, Overrides, RawConfigFile};
use forkseed::errors::ForkseedError;
use forkseed::fork::ForkLauncher;
use forkseed::types::StderrPolicy;
use tokio::time::timeout;

/// Launcher whose "anvil" is a shell script that ignores its arguments.
fn launcher_for(node: &Path, stderr: StderrPolicy) -> ForkLauncher {
    let mut raw = RawConfigFile::default();
    raw.node.anvil = node.display().to_string();
    raw.node.stderr = stderr;
    raw.apply_overrides(&Overrides {
        api_key: Some("ABC".into()),
        port: Some(8545),
        recipient: None,
    });
    let cfg = ConfigFile::from_raw_with_env(raw, |_| None).unwrap();
    ForkLauncher::from_config(&cfg).unwrap()
}

#[tokio::test]
async fn long_running_node_never_resolves() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let node = write_script(
        dir.path(),
        "anvil",
        "echo \"args: $*\"\necho 'Listening on 127.0.0.1:8545'\nexec sleep 30",
    );
    let launcher = launcher_for(&node, StderrPolicy::Log);

    let rendered = launcher.command().to_string();
    assert!(rendered.contains("ABC"));
    assert!(rendered.contains("8545"));

    let res = timeout(
        Duration::from_millis(500),
        launcher.run_until(std::future::pending()),
    )
    .await;
    assert!(res.is_err(), "launcher resolved while the node was running");
}

#[tokio::test]
async fn node_keeps_running_after_non_utf8_output() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let node = write_script(
        dir.path(),
        "anvil",
        "printf '\\377\\376\\n'\nprintf '\\377 on stderr\\n' >&2\nwhile true; do echo tick; echo tock >&2; sleep 0.1; done",
    );
    let launcher = launcher_for(&node, StderrPolicy::Log);

    let res = timeout(Duration::from_secs(2), launcher.run_until(std::future::pending())).await;
    assert!(res.is_err(), "node stopped after writing invalid UTF-8: {res:?}");
}

#[tokio::test]
async fn shutdown_stops_node_cleanly() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let node = write_script(dir.path(), "anvil", "exec sleep 30");
    let launcher = launcher_for(&node, StderrPolicy::Log);

    let res = timeout(
        Duration::from_secs(5),
        launcher.run_until(tokio::time::sleep(Duration::from_millis(200))),
    )
    .await
    .expect("launcher did not stop after shutdown");
    assert!(res.is_ok(), "{res:?}");
}

#[tokio::test]
async fn crashing_node_is_reported() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let node = write_script(
        dir.path(),
        "anvil",
        "echo 'Error: failed to get fork block number' >&2\nexit 1",
    );
    let launcher = launcher_for(&node, StderrPolicy::Log);

    let err = timeout(Duration::from_secs(5), launcher.run_until(std::future::pending()))
        .await
        .expect("launcher hung on a crashed node")
        .unwrap_err();

    match err {
        ForkseedError::CommandFailed { code, stderr, command } => {
            assert_eq!(code, Some(1));
            assert!(stderr.contains("failed to get fork block number"));
            assert!(command.contains("--fork-url"));
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn clean_exit_with_diagnostics_follows_policy() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let node = write_script(dir.path(), "anvil", "echo 'warning: slow upstream' >&2\nexit 0");

    let lenient = launcher_for(&node, StderrPolicy::Log);
    assert!(lenient.run_until(std::future::pending()).await.is_ok());

    let strict = launcher_for(&node, StderrPolicy::Fail);
    let err = strict.run_until(std::future::pending()).await.unwrap_err();
    assert!(matches!(err, ForkseedError::StderrOutput { .. }), "{err:?}");
}

#[tokio::test]
async fn missing_node_binary_is_spawn_error() {
    let launcher = launcher_for(Path::new("/nonexistent/anvil"), StderrPolicy::Log);
    let err = launcher.run_until(std::future::pending()).await.unwrap_err();
    assert!(matches!(err, ForkseedError::Spawn { .. }), "{err:?}");
}
