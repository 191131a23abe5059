// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{RawConfigFile, Settings};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** resolve paths or
/// validate values. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path, validate it and resolve it into
/// [`Settings`].
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Settings> {
    let raw_config = load_from_path(&path)?;
    Settings::try_from(raw_config)
}

/// Settings for the agent: from the given config file, or built-in defaults
/// when no config file is supplied.
pub fn load_or_default(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => load_and_validate(path),
        None => Settings::try_from(RawConfigFile::default()),
    }
}
