// src/config/validate.rs

use tracing::warn;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{ReloaderError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ReloaderError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watch, raw.skip))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_rules(cfg)?;
    validate_rules(cfg)?;
    validate_skip_folders(cfg)?;
    Ok(())
}

fn ensure_has_rules(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.is_empty() {
        warn!("config has no [[watch]] entries; nothing will run");
    }
    Ok(())
}

// Glob syntax is deliberately not checked here: a broken pattern only
// disables its own rule (see `watch::rules`).
fn validate_rules(cfg: &RawConfigFile) -> Result<()> {
    for (idx, rule) in cfg.watch.iter().enumerate() {
        if rule.pattern.trim().is_empty() {
            return Err(ReloaderError::ConfigError(format!(
                "[[watch]] entry #{} has an empty `pattern`",
                idx + 1
            )));
        }
        if rule.command.trim().is_empty() {
            return Err(ReloaderError::ConfigError(format!(
                "[[watch]] entry for pattern '{}' has an empty `command`",
                rule.pattern
            )));
        }
        if let Some(log) = &rule.log {
            if log.trim().is_empty() {
                return Err(ReloaderError::ConfigError(format!(
                    "[[watch]] entry for pattern '{}' has an empty `log` path",
                    rule.pattern
                )));
            }
        }
    }
    Ok(())
}

fn validate_skip_folders(cfg: &RawConfigFile) -> Result<()> {
    for folder in cfg.skip.folders.iter() {
        if folder.is_empty() || folder.contains('/') || folder.contains('\\') {
            return Err(ReloaderError::ConfigError(format!(
                "[skip].folders entries must be plain folder names (got '{}')",
                folder
            )));
        }
    }
    Ok(())
}
