// src/config/model.rs

use serde::{Deserialize, Deserializer};

/// Configuration exactly as read from a TOML file, before validation.
///
/// ```toml
/// [skip]
/// folders = [".git", "target"]
///
/// [[watch]]
/// pattern = "*.rs"
/// command = "cargo build"
/// delay = 1000
/// start = true
/// log = "target/build.log"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Watch rules from `[[watch]]`, in file order.
    #[serde(default)]
    pub watch: Vec<WatchConfig>,

    /// Directories excluded from watching, from `[skip]`.
    #[serde(default)]
    pub skip: SkipSection,
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`), so
/// holding one means the invariants have been checked.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    watch: Vec<WatchConfig>,
    skip: SkipSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watch: Vec<WatchConfig>, skip: SkipSection) -> Self {
        Self { watch, skip }
    }

    pub fn rules(&self) -> &[WatchConfig] {
        &self.watch
    }

    pub fn skip_folders(&self) -> &[String] {
        &self.skip.folders
    }
}

/// `[skip]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkipSection {
    /// Folder *names* (not paths) that are never watched, e.g. `".git"`.
    #[serde(default)]
    pub folders: Vec<String>,
}

/// One `[[watch]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Glob matched against the base name of a changed file.
    pub pattern: String,

    /// Shell command line to run.
    pub command: String,

    /// Optional file whose new lines are echoed to stdout.
    #[serde(default)]
    pub log: Option<String>,

    /// Prefix printed before each followed log line, as `[tag] `.
    #[serde(default)]
    pub log_tag: Option<String>,

    /// Debounce delay in milliseconds.
    #[serde(default)]
    pub delay: u64,

    /// Run the command once at startup.
    ///
    /// Accepts either a boolean or an integer, where any non-zero value
    /// means true.
    #[serde(default, deserialize_with = "bool_or_int")]
    pub start: bool,
}

fn bool_or_int<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
    })
}
