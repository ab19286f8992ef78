// src/config/mod.rs

//! Configuration loading and validation for watchrun.
//!
//! Responsibilities:
//! - Define the serde-backed data model (`model.rs`).
//! - Parse duration strings for timeouts and `sleep` (`duration.rs`).
//! - Load a YAML or TOML config file from disk (`loader.rs`).
//! - Validate the parsed document (`validate.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::{parse_duration, DurationError};
pub use loader::{load_and_validate, load_from_path, ConfigFormat, DEFAULT_CONFIG_PATH};
pub use model::{CommandConfig, Config, RawConfig, WatchConfig, DEFAULT_COMMAND_TIMEOUT};
