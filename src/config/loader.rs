// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{Config, RawConfig};
use crate::errors::Result;

/// Document format, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are read as TOML; everything else as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Parse a config document held in memory.
pub fn parse_str(contents: &str, format: ConfigFormat) -> Result<RawConfig> {
    let config = match format {
        // An empty YAML document deserializes as unit, not as a map.
        ConfigFormat::Yaml if contents.trim().is_empty() => RawConfig::default(),
        ConfigFormat::Yaml => serde_yaml::from_str(contents)?,
        ConfigFormat::Toml => toml::from_str(contents)?,
    };
    Ok(config)
}

/// Load a configuration file from a given path and return the `RawConfig`.
///
/// This only performs deserialization; it does **not** run semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    parse_str(&contents, ConfigFormat::from_path(path))
}

/// Load a configuration file from path and run validation.
///
/// This is the entry point used by `main`: any error here is fatal and
/// happens before a single command or watcher is started.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Config> {
    let raw_config = load_from_path(&path)?;
    Ok(Config::from(raw_config))
}

/// Config file used when `--conf` is not given, relative to the working
/// directory.
pub const DEFAULT_CONFIG_PATH: &str = "watch.yml";
