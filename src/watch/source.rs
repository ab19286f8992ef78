// src/watch/source.rs

//! Seams between the supervisor and the native watcher.
//!
//! Production code uses [`NotifySourceFactory`](super::watcher::NotifySourceFactory);
//! tests provide their own factory that records which sources were created and
//! which paths were registered, and injects events by hand.

use std::path::Path;

use tokio::sync::mpsc;

use crate::errors::WatchError;
use crate::watch::event::ChangeEvent;

/// Everything a watcher's subscription can deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchMessage {
    Change(ChangeEvent),
    /// Error reported by the subscription itself (not by a command).
    Error(String),
}

pub type WatchSender = mpsc::UnboundedSender<WatchMessage>;

/// Unbounded, non-restartable stream of [`WatchMessage`]s.
///
/// Ends once every sender is gone, i.e. when the owning source is dropped.
#[derive(Debug)]
pub struct WatchStream {
    rx: mpsc::UnboundedReceiver<WatchMessage>,
}

impl WatchStream {
    /// Create a connected sender/stream pair.
    pub fn channel() -> (WatchSender, WatchStream) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, WatchStream { rx })
    }

    pub async fn recv(&mut self) -> Option<WatchMessage> {
        self.rx.recv().await
    }
}

/// One live subscription that paths can be added to.
pub trait WatchSource: Send + 'static {
    fn add(&mut self, path: &Path) -> Result<(), WatchError>;
}

/// Creates one independent [`WatchSource`] per enabled watcher.
pub trait WatchSourceFactory: Send + Sync {
    type Source: WatchSource;

    fn create(&self, watcher: &str, recursive: bool)
        -> notify::Result<(Self::Source, WatchStream)>;
}
