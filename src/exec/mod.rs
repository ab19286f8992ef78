// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] runs a single command with its timeout, working directory
//!   and the built-in `sleep` form, behind a fault barrier.
//! - [`backend`] defines the pluggable [`CommandRunner`] trait and the
//!   production [`ProcessRunner`].
//! - [`group`] runs an ordered list of commands strictly sequentially.

pub mod backend;
pub mod command;
pub mod group;

pub use backend::{CommandRunner, ProcessRunner};
pub use command::{execute, guarded, run_command};
pub use group::run_group;
