// src/engine/dispatch.rs

use std::fmt;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::config::model::CommandConfig;
use crate::exec::{run_group, CommandRunner};
use crate::watch::{WatchMessage, WatchSource, WatchStream};

/// Event-to-dispatch loop for one enabled watcher.
///
/// Owns the watcher's subscription for its whole life: the source is kept
/// alive here and only dropped when the loop ends.
pub struct WatchLoop<S: WatchSource> {
    name: String,
    source: S,
    stream: WatchStream,
    commands: Arc<[CommandConfig]>,
    runner: Arc<dyn CommandRunner>,
}

impl<S: WatchSource> fmt::Debug for WatchLoop<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchLoop")
            .field("name", &self.name)
            .field("commands", &self.commands.len())
            .finish_non_exhaustive()
    }
}

impl<S: WatchSource> WatchLoop<S> {
    pub fn new(
        name: String,
        source: S,
        stream: WatchStream,
        commands: Arc<[CommandConfig]>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            name,
            source,
            stream,
            commands,
            runner,
        }
    }

    /// Consume the stream until it closes.
    ///
    /// Every write event spawns a full, independent run of the command
    /// group. Runs are neither coalesced nor serialized against each other,
    /// so rapid writes can produce overlapping runs.
    ///
    /// Runs are owned by the loop: aborting the loop task aborts every run
    /// still in flight, and a loop that ends on its own waits for them.
    pub async fn run(mut self) {
        debug!(watcher = %self.name, "watch loop started");

        let mut runs = JoinSet::new();
        loop {
            tokio::select! {
                message = self.stream.recv() => {
                    let Some(message) = message else { break };
                    self.handle(message, &mut runs);
                }
                Some(joined) = runs.join_next(), if !runs.is_empty() => {
                    if let Err(err) = joined {
                        error!(watcher = %self.name, error = %err, "command group task failed");
                    }
                }
            }
        }

        debug!(watcher = %self.name, "watch loop ended");
        drop(self.source);
        while runs.join_next().await.is_some() {}
    }

    fn handle(&self, message: WatchMessage, runs: &mut JoinSet<()>) {
        match message {
            WatchMessage::Change(event) if event.is_write() => {
                info!(
                    watcher = %self.name,
                    path = ?event.path,
                    "{} {} changed",
                    self.name,
                    event.path.display()
                );
                let name = self.name.clone();
                let commands = Arc::clone(&self.commands);
                let runner = Arc::clone(&self.runner);
                runs.spawn(async move {
                    run_group(runner.as_ref(), &name, &commands).await;
                });
            }
            WatchMessage::Change(event) => {
                debug!(
                    watcher = %self.name,
                    path = ?event.path,
                    kind = ?event.kind,
                    "ignoring non-write change"
                );
            }
            WatchMessage::Error(err) => {
                error!(watcher = %self.name, error = %err, "file watch error");
            }
        }
    }
}
