// src/watch/mod.rs

//! File watching.
//!
//! This module is responsible for:
//! - Wrapping one cross-platform `notify` subscription per watcher.
//! - Turning native notifications into [`ChangeEvent`]s, one per path.
//! - Exposing the [`WatchSource`] / [`WatchSourceFactory`] seams used by the
//!   supervisor.
//!
//! It does **not** run commands; it only reports what changed.

pub mod event;
pub mod source;
pub mod watcher;

pub use event::{ChangeEvent, ChangeKind};
pub use source::{WatchMessage, WatchSender, WatchSource, WatchSourceFactory, WatchStream};
pub use watcher::{NotifySourceFactory, PathWatcher};
