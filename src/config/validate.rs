// src/config/validate.rs

use tracing::warn;

use crate::config::model::{CommandConfig, Config, RawConfig};

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        warn_on_suspicious(&raw);
        Config::new_unchecked(raw.commands, raw.watchers)
    }
}

/// Semantic checks against a freshly parsed configuration.
///
/// Nothing here is fatal. An empty `command` can only fail when it runs, and
/// the executor reports that as a spawn error. An enabled watcher without
/// targets can never fire.
fn warn_on_suspicious(cfg: &RawConfig) -> usize {
    let mut warnings = empty_commands("commands", &cfg.commands);

    for (idx, watcher) in cfg.watchers.iter().enumerate() {
        let label = watcher.label(idx);
        let location = format!("watchers[{idx}] ({label}).commands");
        warnings += empty_commands(&location, &watcher.commands);

        if watcher.enable && watcher.targets.is_empty() {
            warn!(watcher = %label, "watcher is enabled but has no targets");
            warnings += 1;
        }
    }

    warnings
}

fn empty_commands(location: &str, commands: &[CommandConfig]) -> usize {
    let mut found = 0;
    for (idx, cmd) in commands.iter().enumerate() {
        if cmd.command.trim().is_empty() {
            warn!(location, "{location}[{idx}] has an empty `command`");
            found += 1;
        }
    }
    found
}
