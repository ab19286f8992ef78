// src/errors.rs

//! Crate-wide error types.
//!
//! - [`WatchrunError`] covers configuration loading and watcher setup; these
//!   are the only errors that ever reach `main`.
//! - [`ExecError`] classifies why a single command failed. The executor logs
//!   these and never propagates them past its own boundary.
//! - [`WatchError`] is returned when a target path cannot be registered.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::config::duration::DurationError;

#[derive(Error, Debug)]
pub enum WatchrunError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to start file watcher for '{watcher}': {source}")]
    Watcher {
        watcher: String,
        #[source]
        source: notify::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Why a single command invocation did not succeed.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to spawn process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to wait for process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("process exited with {0}")]
    ExitStatus(std::process::ExitStatus),

    #[error("timed out after {0:?}; process killed")]
    Timeout(Duration),

    #[error("invalid sleep duration: {0}")]
    InvalidSleep(#[from] DurationError),

    #[error("command panicked: {0}")]
    Fault(String),
}

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("failed to watch {path:?}: {source}")]
    Register {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WatchrunError>;
