use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use watchrun::errors::WatchError;
use watchrun::watch::{
    ChangeEvent, ChangeKind, WatchMessage, WatchSender, WatchSource, WatchSourceFactory,
    WatchStream,
};

#[derive(Default)]
struct FakeWatchState {
    created: Vec<String>,
    registered: Vec<(String, PathBuf)>,
    senders: HashMap<String, WatchSender>,
    fail_create: HashSet<String>,
    reject_paths: HashSet<PathBuf>,
}

/// A fake watch factory that:
/// - records every source it creates and every path registered on it
/// - can be told to fail creation for a named watcher, or to reject a path
/// - lets tests inject change events and subscription errors by name.
///
/// Clones share state, so tests keep one clone and hand the other to the
/// supervisor.
#[derive(Clone, Default)]
pub struct FakeWatchFactory {
    state: Arc<Mutex<FakeWatchState>>,
}

impl FakeWatchFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(self, watcher: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .fail_create
            .insert(watcher.to_string());
        self
    }

    pub fn rejecting_path(self, path: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .reject_paths
            .insert(PathBuf::from(path));
        self
    }

    /// Names of watchers a source was created for, in creation order.
    pub fn created(&self) -> Vec<String> {
        self.state.lock().unwrap().created.clone()
    }

    /// Paths successfully registered on the named watcher.
    pub fn registered_paths(&self, watcher: &str) -> Vec<PathBuf> {
        self.state
            .lock()
            .unwrap()
            .registered
            .iter()
            .filter(|(w, _)| w == watcher)
            .map(|(_, p)| p.clone())
            .collect()
    }

    pub fn total_registered(&self) -> usize {
        self.state.lock().unwrap().registered.len()
    }

    pub fn send_change(&self, watcher: &str, path: &str, kind: ChangeKind) {
        self.send(watcher, WatchMessage::Change(ChangeEvent::new(path, kind)));
    }

    pub fn send_error(&self, watcher: &str, message: &str) {
        self.send(watcher, WatchMessage::Error(message.to_string()));
    }

    fn send(&self, watcher: &str, message: WatchMessage) {
        let state = self.state.lock().unwrap();
        let tx = state
            .senders
            .get(watcher)
            .unwrap_or_else(|| panic!("no source was created for watcher '{watcher}'"));
        tx.send(message).expect("watch loop has stopped");
    }
}

impl WatchSourceFactory for FakeWatchFactory {
    type Source = FakeSource;

    fn create(&self, watcher: &str, _recursive: bool) -> notify::Result<(FakeSource, WatchStream)> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create.contains(watcher) {
            return Err(notify::Error::generic("simulated watcher creation failure"));
        }

        let (tx, stream) = WatchStream::channel();
        state.created.push(watcher.to_string());
        state.senders.insert(watcher.to_string(), tx);

        let source = FakeSource {
            name: watcher.to_string(),
            state: Arc::clone(&self.state),
        };
        Ok((source, stream))
    }
}

pub struct FakeSource {
    name: String,
    state: Arc<Mutex<FakeWatchState>>,
}

impl WatchSource for FakeSource {
    fn add(&mut self, path: &Path) -> Result<(), WatchError> {
        let mut state = self.state.lock().unwrap();
        if state.reject_paths.contains(path) {
            return Err(WatchError::Register {
                path: path.to_path_buf(),
                source: notify::Error::path_not_found().add_path(path.to_path_buf()),
            });
        }
        state.registered.push((self.name.clone(), path.to_path_buf()));
        Ok(())
    }
}
