// src/watch/watcher.rs

use std::path::Path;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

use crate::errors::WatchError;
use crate::watch::event::ChangeEvent;
use crate::watch::source::{WatchMessage, WatchSender, WatchSource, WatchSourceFactory, WatchStream};

/// One native filesystem subscription, owned by a single watcher loop.
///
/// Dropping it tears down the subscription and closes its [`WatchStream`].
pub struct PathWatcher {
    name: String,
    mode: RecursiveMode,
    inner: RecommendedWatcher,
}

impl std::fmt::Debug for PathWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathWatcher")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .finish()
    }
}

impl PathWatcher {
    /// Create a new native watcher named `name` (used only for logging).
    ///
    /// Directory targets added later are watched recursively only when
    /// `recursive` is set; otherwise just their direct children are.
    pub fn new(name: impl Into<String>, recursive: bool) -> notify::Result<(Self, WatchStream)> {
        let name = name.into();
        let (tx, stream) = WatchStream::channel();

        // Closure called synchronously by notify on its own thread.
        let inner = RecommendedWatcher::new(
            move |res: notify::Result<Event>| forward(&tx, res),
            Config::default(),
        )?;

        let mode = if recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };

        debug!(watcher = %name, ?mode, "native watcher created");
        Ok((Self { name, mode, inner }, stream))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a file or directory for change notification.
    pub fn add(&mut self, path: impl AsRef<Path>) -> Result<(), WatchError> {
        let path = path.as_ref();
        self.inner
            .watch(path, self.mode)
            .map_err(|source| WatchError::Register {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl WatchSource for PathWatcher {
    fn add(&mut self, path: &Path) -> Result<(), WatchError> {
        PathWatcher::add(self, path)
    }
}

fn forward(tx: &WatchSender, res: notify::Result<Event>) {
    // A closed channel means the loop is gone; nothing left to notify.
    match res {
        Ok(event) => {
            for change in ChangeEvent::from_notify(&event) {
                let _ = tx.send(WatchMessage::Change(change));
            }
        }
        Err(err) => {
            let _ = tx.send(WatchMessage::Error(err.to_string()));
        }
    }
}

/// Production factory: one [`PathWatcher`] per enabled watcher.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifySourceFactory;

impl WatchSourceFactory for NotifySourceFactory {
    type Source = PathWatcher;

    fn create(&self, watcher: &str, recursive: bool) -> notify::Result<(PathWatcher, WatchStream)> {
        PathWatcher::new(watcher, recursive)
    }
}
