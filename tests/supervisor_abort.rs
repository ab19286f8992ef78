// tests/supervisor_abort.rs
//
// Aborting the supervisor handle has to reach the child processes, not just
// the tasks awaiting them.
#![cfg(unix)]

use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use watchrun::config::CommandConfig;
use watchrun::engine::Supervisor;
use watchrun::exec::ProcessRunner;
use watchrun::watch::ChangeKind;
use watchrun_test_utils::builders::{cmd, ConfigBuilder, WatchConfigBuilder};
use watchrun_test_utils::fake_watch::FakeWatchFactory;
use watchrun_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn late_writer(marker: &Path) -> CommandConfig {
    cmd(
        "sh",
        &["-c", &format!("sleep 1; echo late > '{}'", marker.display())],
    )
}

#[tokio::test]
async fn abort_all_kills_running_startup_command() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let marker = dir.path().join("marker");

    let cfg = ConfigBuilder::new().with_startup(late_writer(&marker)).build();
    let supervisor = Supervisor::new(FakeWatchFactory::new(), Arc::new(ProcessRunner));
    let handle = supervisor.watch(Arc::new(cfg))?;

    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.abort_all();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert!(!marker.exists(), "startup command outlived abort_all");
    Ok(())
}

#[tokio::test]
async fn abort_all_kills_running_change_commands() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let marker = dir.path().join("marker");

    let factory = FakeWatchFactory::new();
    let cfg = ConfigBuilder::new()
        .with_watcher(
            WatchConfigBuilder::new("app")
                .target("src")
                .command(late_writer(&marker))
                .build(),
        )
        .build();
    let supervisor = Supervisor::new(factory.clone(), Arc::new(ProcessRunner));
    let handle = supervisor.watch(Arc::new(cfg))?;

    factory.send_change("app", "src/lib.rs", ChangeKind::Write);
    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.abort_all();
    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert!(!marker.exists(), "change command outlived abort_all");
    Ok(())
}
