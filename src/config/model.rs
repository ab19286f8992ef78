// src/config/model.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::config::duration::deserialize_opt_duration;

/// Timeout applied to a command that does not configure one (or sets it to
/// zero).
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Top-level configuration as read from disk, before validation.
///
/// ```yaml
/// commands:
///   - command: echo
///     args: ["start"]
/// watchers:
///   - name: docs
///     enable: true
///     targets: ["./docs"]
///     commands:
///       - command: make
///         args: ["html"]
///         dir: ./docs
///         timeout: 2m
/// ```
///
/// Both sections are optional. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    /// Startup commands, run once in order.
    #[serde(default)]
    pub commands: Vec<CommandConfig>,

    /// Watcher definitions, set up in order.
    #[serde(default)]
    pub watchers: Vec<WatchConfig>,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfig>` (see `validate.rs`), so
/// holding a `Config` means every command has passed validation. It is
/// shared read-only between all tasks once loaded.
#[derive(Debug, Clone)]
pub struct Config {
    commands: Vec<CommandConfig>,
    watchers: Vec<WatchConfig>,
}

impl Config {
    pub(crate) fn new_unchecked(commands: Vec<CommandConfig>, watchers: Vec<WatchConfig>) -> Self {
        Self { commands, watchers }
    }

    pub fn commands(&self) -> &[CommandConfig] {
        &self.commands
    }

    pub fn watchers(&self) -> &[WatchConfig] {
        &self.watchers
    }

    pub fn enabled_watchers(&self) -> impl Iterator<Item = &WatchConfig> {
        self.watchers.iter().filter(|w| w.enable)
    }
}

/// One `watchers[]` entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchConfig {
    /// Label used in log lines only.
    #[serde(default)]
    pub name: Option<String>,

    /// Disabled watchers are skipped entirely.
    #[serde(default)]
    pub enable: bool,

    /// Files or directories to subscribe to.
    #[serde(default)]
    pub targets: Vec<String>,

    /// Commands run, in order, on every qualifying change.
    #[serde(default)]
    pub commands: Vec<CommandConfig>,

    /// Watch directory targets recursively instead of only their direct
    /// children.
    #[serde(default)]
    pub recursive: bool,
}

impl WatchConfig {
    /// Name for log correlation, falling back to the watcher's position.
    pub fn label(&self, index: usize) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("watcher-{index}"),
        }
    }
}

/// One invocable unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CommandConfig {
    /// Executable name (looked up on `PATH`).
    #[serde(default)]
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory; the process cwd when unset.
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Duration string such as `"10s"`; see [`effective_timeout`](Self::effective_timeout).
    #[serde(default, deserialize_with = "deserialize_opt_duration")]
    pub timeout: Option<Duration>,
}

impl CommandConfig {
    /// Configured timeout, or [`DEFAULT_COMMAND_TIMEOUT`] when unset or zero.
    pub fn effective_timeout(&self) -> Duration {
        match self.timeout {
            Some(t) if !t.is_zero() => t,
            _ => DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// The `sleep <duration>` form, which blocks instead of spawning.
    pub fn sleep_arg(&self) -> Option<&str> {
        match self.args.as_slice() {
            [arg] if self.command == "sleep" => Some(arg.as_str()),
            _ => None,
        }
    }
}

/// Rendered as `"<command> <args joined by space>"`, the form used in logs.
impl fmt::Display for CommandConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.command, self.args.join(" "))
    }
}
