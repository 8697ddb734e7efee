// src/errors.rs

//! Fatal startup errors and the crate-wide `Result` alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReloaderError {
    #[error("config file {path:?} not found; please create it (see demos/Reloader.toml for an example)")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("unable to resolve the working directory: {0}")]
    WorkingDir(#[source] std::io::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("file watcher error: {0}")]
    WatchError(#[from] notify::Error),
}

pub type Result<T> = std::result::Result<T, ReloaderError>;
