// src/engine/supervisor.rs

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::model::{CommandConfig, Config};
use crate::errors::{Result, WatchrunError};
use crate::exec::{run_group, CommandRunner};
use crate::watch::{WatchSource, WatchSourceFactory};

use super::dispatch::WatchLoop;

/// Label of the startup command group in logs.
pub const STARTUP_GROUP: &str = "startup";

/// Bootstraps the startup commands and one independent loop per enabled
/// watcher.
pub struct Supervisor<F: WatchSourceFactory> {
    factory: F,
    runner: Arc<dyn CommandRunner>,
}

impl<F: WatchSourceFactory> fmt::Debug for Supervisor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor").finish_non_exhaustive()
    }
}

impl<F: WatchSourceFactory> Supervisor<F> {
    pub fn new(factory: F, runner: Arc<dyn CommandRunner>) -> Self {
        Self { factory, runner }
    }

    /// Start everything described by `config` and return once setup has been
    /// issued. Nothing here waits for a command to run.
    ///
    /// 1. The startup group is spawned in the background.
    /// 2. Each enabled watcher gets its own source, has its targets
    ///    registered (failures are logged and skipped), and its loop spawned.
    ///
    /// If a watcher's source cannot be created, the error is returned
    /// immediately and the remaining watchers are never set up. Tasks spawned
    /// before that point keep running detached.
    pub fn watch(&self, config: Arc<Config>) -> Result<SupervisorHandle> {
        info!("running startup commands");
        let startup = {
            let config = Arc::clone(&config);
            let runner = Arc::clone(&self.runner);
            tokio::spawn(async move {
                run_group(runner.as_ref(), STARTUP_GROUP, config.commands()).await;
            })
        };

        let mut handle = SupervisorHandle {
            startup: Some(startup),
            watchers: Vec::new(),
        };

        for (idx, watch_cfg) in config.watchers().iter().enumerate() {
            let name = watch_cfg.label(idx);
            if !watch_cfg.enable {
                debug!(watcher = %name, "watcher disabled; skipping");
                continue;
            }

            let (mut source, stream) = self
                .factory
                .create(&name, watch_cfg.recursive)
                .map_err(|source| {
                    error!(watcher = %name, error = %source, "failed to start file watcher");
                    WatchrunError::Watcher {
                        watcher: name.clone(),
                        source,
                    }
                })?;

            for target in &watch_cfg.targets {
                register_target(&name, &mut source, target);
            }

            let commands: Arc<[CommandConfig]> = watch_cfg.commands.clone().into();
            let watch_loop = WatchLoop::new(name, source, stream, commands, Arc::clone(&self.runner));
            handle.watchers.push(tokio::spawn(watch_loop.run()));
        }

        Ok(handle)
    }
}

fn register_target<S: WatchSource>(watcher: &str, source: &mut S, target: &str) {
    match source.add(Path::new(target)) {
        Ok(()) => info!(watcher, "watching: {target}"),
        Err(err) => {
            error!(watcher, path = %target, error = %err, "failed to watch {target:?}");
            debug!(watcher, "watching: {target} (not registered)");
        }
    }
}

/// Handles of every task the supervisor spawned.
///
/// Dropping the handle does not stop anything; tasks only end with the
/// process or through [`abort_all`](Self::abort_all).
#[derive(Debug)]
pub struct SupervisorHandle {
    startup: Option<JoinHandle<()>>,
    watchers: Vec<JoinHandle<()>>,
}

impl SupervisorHandle {
    /// Number of watcher loops that were started.
    pub fn watcher_count(&self) -> usize {
        self.watchers.len()
    }

    /// Wait for the startup group to finish. Returns immediately if it was
    /// already awaited.
    pub async fn wait_startup(&mut self) {
        if let Some(startup) = self.startup.take() {
            if let Err(err) = startup.await {
                error!(error = %err, "startup command group task failed");
            }
        }
    }

    /// Abort the startup group, every watcher loop, and every group run a
    /// loop has started. Child processes still running are killed.
    pub fn abort_all(&self) {
        if let Some(startup) = &self.startup {
            startup.abort();
        }
        for watcher in &self.watchers {
            watcher.abort();
        }
    }
}
