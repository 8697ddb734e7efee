#![allow(dead_code)]

use reloader::config::{ConfigFile, RawConfigFile, SkipSection, WatchConfig};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                watch: Vec::new(),
                skip: SkipSection::default(),
            },
        }
    }

    pub fn with_rule(mut self, rule: WatchConfig) -> Self {
        self.config.watch.push(rule);
        self
    }

    pub fn skip_folder(mut self, name: &str) -> Self {
        self.config.skip.folders.push(name.to_string());
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for a single `[[watch]]` entry.
pub struct WatchConfigBuilder {
    rule: WatchConfig,
}

impl WatchConfigBuilder {
    pub fn new(pattern: &str, command: &str) -> Self {
        Self {
            rule: WatchConfig {
                pattern: pattern.to_string(),
                command: command.to_string(),
                log: None,
                log_tag: None,
                delay: 0,
                start: false,
            },
        }
    }

    pub fn delay_ms(mut self, ms: u64) -> Self {
        self.rule.delay = ms;
        self
    }

    pub fn start(mut self, val: bool) -> Self {
        self.rule.start = val;
        self
    }

    pub fn log(mut self, path: &str) -> Self {
        self.rule.log = Some(path.to_string());
        self
    }

    pub fn log_tag(mut self, tag: &str) -> Self {
        self.rule.log_tag = Some(tag.to_string());
        self
    }

    pub fn build(self) -> WatchConfig {
        self.rule
    }
}
