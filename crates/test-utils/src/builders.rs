#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use watchrun::config::{CommandConfig, Config, RawConfig, WatchConfig};

/// Shorthand for a command with arguments and no dir/timeout.
pub fn cmd(command: &str, args: &[&str]) -> CommandConfig {
    CommandBuilder::new(command).args(args).build()
}

/// Builder for `Config` to simplify test setup.
#[derive(Default)]
pub struct ConfigBuilder {
    config: RawConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_startup(mut self, cmd: CommandConfig) -> Self {
        self.config.commands.push(cmd);
        self
    }

    pub fn with_watcher(mut self, watcher: WatchConfig) -> Self {
        self.config.watchers.push(watcher);
        self
    }

    pub fn build(self) -> Config {
        Config::from(self.config)
    }
}

/// Builder for `WatchConfig`. Watchers start out enabled.
pub struct WatchConfigBuilder {
    watcher: WatchConfig,
}

impl WatchConfigBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            watcher: WatchConfig {
                name: Some(name.to_string()),
                enable: true,
                ..Default::default()
            },
        }
    }

    pub fn enabled(mut self, val: bool) -> Self {
        self.watcher.enable = val;
        self
    }

    pub fn recursive(mut self, val: bool) -> Self {
        self.watcher.recursive = val;
        self
    }

    pub fn target(mut self, path: &str) -> Self {
        self.watcher.targets.push(path.to_string());
        self
    }

    pub fn command(mut self, cmd: CommandConfig) -> Self {
        self.watcher.commands.push(cmd);
        self
    }

    pub fn build(self) -> WatchConfig {
        self.watcher
    }
}

/// Builder for `CommandConfig`.
pub struct CommandBuilder {
    cmd: CommandConfig,
}

impl CommandBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            cmd: CommandConfig {
                command: command.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.cmd.args.push(arg.to_string());
        self
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args.extend(args.iter().map(|a| a.to_string()));
        self
    }

    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cmd.dir = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.cmd.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> CommandConfig {
        self.cmd
    }
}
