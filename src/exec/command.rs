// src/exec/command.rs

//! Single-command execution.
//!
//! [`run_command`] is the boundary the rest of the crate calls: it logs the
//! command, runs it behind a fault barrier, and swallows every failure after
//! logging it. [`execute`] is the unguarded body and reports *why* a command
//! failed, which is what tests assert on.

use std::any::Any;
use std::future::Future;
use std::process::Stdio;

use tokio::process::Command;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use crate::config::duration::parse_duration;
use crate::config::model::CommandConfig;
use crate::errors::ExecError;

/// Run one command to completion or timeout.
///
/// Never returns an error and never panics: spawn failures, non-zero exits,
/// timeouts, bad `sleep` durations, and panics inside the execution are all
/// logged with the rendered command and then dropped.
pub async fn run_command(cmd: &CommandConfig) {
    info!(cmd = %cmd, "running: {cmd}");

    let owned = cmd.clone();
    let result = guarded(async move { execute(&owned).await }).await;

    match result {
        Ok(()) => debug!(cmd = %cmd, "command finished"),
        Err(err) => error!(cmd = %cmd, error = %err, "cmd {cmd} failed"),
    }
}

/// Execute a command and report how it ended.
///
/// - `sleep <duration>` (exactly one argument) sleeps the calling task
///   without spawning a process.
/// - Anything else is spawned directly (no shell), with stdout and stderr
///   inherited from this process, and killed if it outlives its timeout.
pub async fn execute(cmd: &CommandConfig) -> Result<(), ExecError> {
    if let Some(arg) = cmd.sleep_arg() {
        let duration = parse_duration(arg)?;
        tokio::time::sleep(duration).await;
        return Ok(());
    }

    let timeout = cmd.effective_timeout();

    let mut process = Command::new(&cmd.command);
    process
        .args(&cmd.args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);
    if let Some(dir) = &cmd.dir {
        process.current_dir(dir);
    }

    let mut child = process.spawn().map_err(ExecError::Spawn)?;

    let waited = tokio::time::timeout(timeout, child.wait()).await;
    match waited {
        Ok(status) => {
            let status = status.map_err(ExecError::Wait)?;
            if status.success() {
                Ok(())
            } else {
                Err(ExecError::ExitStatus(status))
            }
        }
        Err(_elapsed) => {
            if let Err(e) = child.kill().await {
                warn!(cmd = %cmd, error = %e, "failed to kill timed out process");
            }
            Err(ExecError::Timeout(timeout))
        }
    }
}

/// Fault barrier: run `fut` in its own task so a panic inside it surfaces
/// here as [`ExecError::Fault`] instead of unwinding into the caller.
///
/// Dropping the returned future aborts the inner task, which drops any
/// running child and kills it.
pub async fn guarded<F>(fut: F) -> Result<(), ExecError>
where
    F: Future<Output = Result<(), ExecError>> + Send + 'static,
{
    let mut task = AbortOnDrop(tokio::spawn(fut));
    match (&mut task.0).await {
        Ok(result) => result,
        Err(join_err) => Err(ExecError::Fault(describe_join_error(join_err))),
    }
}

struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn describe_join_error(err: JoinError) -> String {
    if err.is_cancelled() {
        return "execution task was cancelled".to_string();
    }
    match err.try_into_panic() {
        Ok(payload) => panic_message(payload.as_ref()),
        Err(err) => err.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
