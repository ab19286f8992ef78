// tests/supervisor.rs

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use watchrun::engine::Supervisor;
use watchrun::errors::WatchrunError;
use watchrun::watch::ChangeKind;
use watchrun_test_utils::builders::{cmd, ConfigBuilder, WatchConfigBuilder};
use watchrun_test_utils::fake_runner::{RecordingRunner, RunRecord};
use watchrun_test_utils::fake_watch::FakeWatchFactory;
use watchrun_test_utils::{init_tracing, wait_until, LogCapture};

type TestResult = Result<(), Box<dyn Error>>;

fn supervisor(
    factory: &FakeWatchFactory,
    runner: &RecordingRunner,
) -> Supervisor<FakeWatchFactory> {
    Supervisor::new(factory.clone(), Arc::new(runner.clone()))
}

#[tokio::test]
async fn disabled_watchers_create_nothing() -> TestResult {
    init_tracing();
    let factory = FakeWatchFactory::new();
    let runner = RecordingRunner::new();

    let cfg = ConfigBuilder::new()
        .with_watcher(
            WatchConfigBuilder::new("off")
                .enabled(false)
                .target("src")
                .command(cmd("echo", &["never"]))
                .build(),
        )
        .with_watcher(WatchConfigBuilder::new("on").target("docs").build())
        .build();

    let handle = supervisor(&factory, &runner).watch(Arc::new(cfg))?;

    assert_eq!(handle.watcher_count(), 1);
    assert_eq!(factory.created(), vec!["on".to_string()]);
    assert!(factory.registered_paths("off").is_empty());
    assert_eq!(factory.registered_paths("on"), vec![PathBuf::from("docs")]);
    assert_eq!(factory.total_registered(), 1);
    Ok(())
}

#[tokio::test]
async fn startup_group_runs_once_in_order() -> TestResult {
    init_tracing();
    let factory = FakeWatchFactory::new();
    let runner = RecordingRunner::new();

    let cfg = ConfigBuilder::new()
        .with_startup(cmd("echo", &["start"]))
        .with_startup(cmd("echo", &["second"]))
        .build();

    let mut handle = supervisor(&factory, &runner).watch(Arc::new(cfg))?;
    handle.wait_startup().await;

    assert_eq!(
        runner.started(),
        vec!["echo start".to_string(), "echo second".to_string()]
    );
    Ok(())
}

#[tokio::test]
async fn watcher_setup_does_not_wait_for_startup() -> TestResult {
    init_tracing();
    let factory = FakeWatchFactory::new();
    let runner = RecordingRunner::new().with_delay("slow", Duration::from_secs(3));

    let cfg = ConfigBuilder::new()
        .with_startup(cmd("slow", &["boot"]))
        .with_watcher(
            WatchConfigBuilder::new("src")
                .target("src")
                .command(cmd("echo", &["changed"]))
                .build(),
        )
        .build();

    let handle = supervisor(&factory, &runner).watch(Arc::new(cfg))?;
    assert_eq!(factory.created(), vec!["src".to_string()]);

    factory.send_change("src", "src/main.rs", ChangeKind::Write);
    wait_until(|| runner.started().contains(&"echo changed".to_string())).await;

    // The startup command is still in flight.
    assert!(!runner.records().contains(&RunRecord::Finished("slow boot".into())));

    handle.abort_all();
    Ok(())
}

#[tokio::test]
async fn one_write_runs_every_command_in_order() -> TestResult {
    init_tracing();
    let factory = FakeWatchFactory::new();
    let runner = RecordingRunner::new().with_delay("build", Duration::from_millis(40));

    let cfg = ConfigBuilder::new()
        .with_watcher(
            WatchConfigBuilder::new("app")
                .target("src")
                .command(cmd("build", &["debug"]))
                .command(cmd("test", &[]))
                .command(cmd("build", &["docs"]))
                .build(),
        )
        .build();

    let _handle = supervisor(&factory, &runner).watch(Arc::new(cfg))?;
    factory.send_change("app", "src/lib.rs", ChangeKind::Write);

    wait_until(|| runner.finished_count() == 3).await;
    assert_eq!(
        runner.records(),
        vec![
            RunRecord::Started("build debug".into()),
            RunRecord::Finished("build debug".into()),
            RunRecord::Started("test ".into()),
            RunRecord::Finished("test ".into()),
            RunRecord::Started("build docs".into()),
            RunRecord::Finished("build docs".into()),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn non_write_events_and_errors_do_not_dispatch() -> TestResult {
    init_tracing();
    let factory = FakeWatchFactory::new();
    let runner = RecordingRunner::new();

    let cfg = ConfigBuilder::new()
        .with_watcher(
            WatchConfigBuilder::new("app")
                .target("src")
                .command(cmd("echo", &["changed"]))
                .build(),
        )
        .build();

    let _handle = supervisor(&factory, &runner).watch(Arc::new(cfg))?;

    for kind in [
        ChangeKind::Create,
        ChangeKind::Remove,
        ChangeKind::Rename,
        ChangeKind::Chmod,
        ChangeKind::Other,
    ] {
        factory.send_change("app", "src/a.rs", kind);
    }
    factory.send_error("app", "inotify queue overflow");

    // The loop survives the error and still reacts to the next write.
    factory.send_change("app", "src/a.rs", ChangeKind::Write);
    wait_until(|| runner.finished_count() == 1).await;

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(runner.started(), vec!["echo changed".to_string()]);
    Ok(())
}

#[tokio::test]
async fn disjoint_watchers_are_independent() -> TestResult {
    init_tracing();
    let factory = FakeWatchFactory::new();
    let runner = RecordingRunner::new();

    let cfg = ConfigBuilder::new()
        .with_watcher(
            WatchConfigBuilder::new("frontend")
                .target("web")
                .command(cmd("npm", &["run", "build"]))
                .build(),
        )
        .with_watcher(
            WatchConfigBuilder::new("backend")
                .target("api")
                .command(cmd("cargo", &["build"]))
                .build(),
        )
        .build();

    let _handle = supervisor(&factory, &runner).watch(Arc::new(cfg))?;
    assert_eq!(
        factory.created(),
        vec!["frontend".to_string(), "backend".to_string()]
    );

    factory.send_change("backend", "api/main.rs", ChangeKind::Write);
    wait_until(|| runner.finished_count() == 1).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(runner.started(), vec!["cargo build".to_string()]);
    Ok(())
}

#[tokio::test]
async fn rapid_writes_produce_overlapping_runs() -> TestResult {
    init_tracing();
    let factory = FakeWatchFactory::new();
    let runner = RecordingRunner::new().with_delay("slow", Duration::from_millis(200));

    let cfg = ConfigBuilder::new()
        .with_watcher(
            WatchConfigBuilder::new("app")
                .target("src")
                .command(cmd("slow", &[]))
                .build(),
        )
        .build();

    let _handle = supervisor(&factory, &runner).watch(Arc::new(cfg))?;
    factory.send_change("app", "src/a.rs", ChangeKind::Write);
    factory.send_change("app", "src/a.rs", ChangeKind::Write);

    wait_until(|| runner.finished_count() == 2).await;

    // Both runs started before either finished: no debounce, no queueing.
    let records = runner.records();
    assert!(matches!(records[0], RunRecord::Started(_)));
    assert!(matches!(records[1], RunRecord::Started(_)));
    Ok(())
}

#[tokio::test]
async fn registration_failure_skips_only_that_path() -> TestResult {
    init_tracing();
    let factory = FakeWatchFactory::new().rejecting_path("missing");
    let runner = RecordingRunner::new();

    let cfg = ConfigBuilder::new()
        .with_watcher(
            WatchConfigBuilder::new("app")
                .target("src")
                .target("missing")
                .target("tests")
                .command(cmd("echo", &["changed"]))
                .build(),
        )
        .build();

    let handle = supervisor(&factory, &runner).watch(Arc::new(cfg))?;

    assert_eq!(handle.watcher_count(), 1);
    assert_eq!(
        factory.registered_paths("app"),
        vec![PathBuf::from("src"), PathBuf::from("tests")]
    );

    factory.send_change("app", "tests/a.rs", ChangeKind::Write);
    wait_until(|| runner.finished_count() == 1).await;
    Ok(())
}

#[tokio::test]
async fn every_target_is_logged_as_watching() -> TestResult {
    let factory = FakeWatchFactory::new().rejecting_path("missing");
    let runner = RecordingRunner::new();
    let cfg = ConfigBuilder::new()
        .with_watcher(
            WatchConfigBuilder::new("app")
                .target("src")
                .target("missing")
                .build(),
        )
        .build();

    let logs = LogCapture::new();
    let handle = {
        let _guard = logs.install();
        supervisor(&factory, &runner).watch(Arc::new(cfg))?
    };

    let out = logs.contents();
    assert!(out.contains("watching: src"), "{out}");
    assert!(out.contains("failed to watch \"missing\""), "{out}");
    assert!(out.contains("watching: missing (not registered)"), "{out}");

    handle.abort_all();
    Ok(())
}

#[tokio::test]
async fn creation_failure_aborts_remaining_setup_only() -> TestResult {
    init_tracing();
    let factory = FakeWatchFactory::new().failing_on("broken");
    let runner = RecordingRunner::new();

    let cfg = ConfigBuilder::new()
        .with_startup(cmd("echo", &["start"]))
        .with_watcher(
            WatchConfigBuilder::new("first")
                .target("a")
                .command(cmd("echo", &["first"]))
                .build(),
        )
        .with_watcher(WatchConfigBuilder::new("broken").target("b").build())
        .with_watcher(WatchConfigBuilder::new("never").target("c").build())
        .build();

    let result = supervisor(&factory, &runner).watch(Arc::new(cfg));

    match result {
        Err(WatchrunError::Watcher { watcher, .. }) => assert_eq!(watcher, "broken"),
        other => panic!("expected Watcher error, got {other:?}"),
    }
    assert_eq!(factory.created(), vec!["first".to_string()]);

    // Work started before the failure keeps running.
    wait_until(|| runner.started().contains(&"echo start".to_string())).await;
    factory.send_change("first", "a/x", ChangeKind::Write);
    wait_until(|| runner.started().contains(&"echo first".to_string())).await;
    Ok(())
}
