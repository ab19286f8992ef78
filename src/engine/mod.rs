// src/engine/mod.rs

//! Orchestration for watchrun.
//!
//! This module ties together:
//! - the startup command group, spawned in the background
//! - one [`WatchLoop`] per enabled watcher, each owning its own subscription
//! - the [`SupervisorHandle`] that keeps every spawned task's handle
//!
//! The supervisor in [`supervisor`] does setup only; the per-watcher
//! event handling lives in [`dispatch`].

pub mod dispatch;
pub mod supervisor;

pub use dispatch::WatchLoop;
pub use supervisor::{Supervisor, SupervisorHandle, STARTUP_GROUP};
