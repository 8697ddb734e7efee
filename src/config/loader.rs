// src/config/loader.rs

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{ReloaderError, Result};

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
///
/// A missing file is reported as [`ReloaderError::ConfigNotFound`] so the
/// binary can tell the user to create one.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(ReloaderError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(err) => return Err(err.into()),
    };

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run basic validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` attributes).
/// - Checks that every rule has a pattern and a command, and that skip
///   folders are plain names. An empty rule list is only warned about.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}
