// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The group runner and the supervisor talk to a `CommandRunner` instead of
//! spawning processes directly. This makes it easy to swap in a recording
//! runner in tests while keeping the production implementation in
//! [`command`](super::command).

use std::future::Future;
use std::pin::Pin;

use crate::config::model::CommandConfig;

use super::command::run_command;

/// Trait abstracting how one command is executed.
///
/// Implementations must uphold the executor contract: the returned future
/// resolves once the command has finished (or timed out) and never surfaces
/// a failure to the caller.
pub trait CommandRunner: Send + Sync {
    fn run<'a>(&'a self, cmd: &'a CommandConfig) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Production runner: spawns real processes through [`run_command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run<'a>(&'a self, cmd: &'a CommandConfig) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(run_command(cmd))
    }
}
