// src/watch/rules.rs

//! Rule table and base-name matching.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use globset::{Glob, GlobMatcher};
use tracing::{error, warn};

use crate::config::ConfigFile;

/// A single compiled `[[watch]]` entry.
///
/// Rules are built once at startup and never mutated. The debounce gate
/// identifies a rule by its pattern string.
#[derive(Clone)]
pub struct WatchRule {
    pattern: String,
    matcher: Result<GlobMatcher, String>,
    command: String,
    log_path: Option<PathBuf>,
    log_tag: Option<String>,
    debounce: Duration,
    run_at_startup: bool,
}

impl fmt::Debug for WatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchRule")
            .field("pattern", &self.pattern)
            .field("command", &self.command)
            .field("debounce", &self.debounce)
            .field("run_at_startup", &self.run_at_startup)
            .finish_non_exhaustive()
    }
}

impl WatchRule {
    pub fn new(pattern: impl Into<String>, command: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let matcher = compile_pattern(&pattern);
        Self {
            pattern,
            matcher,
            command: command.into(),
            log_path: None,
            log_tag: None,
            debounce: Duration::ZERO,
            run_at_startup: false,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_run_at_startup(mut self, run_at_startup: bool) -> Self {
        self.run_at_startup = run_at_startup;
        self
    }

    pub fn with_log(mut self, path: impl Into<PathBuf>, tag: Option<String>) -> Self {
        self.log_path = Some(path.into());
        self.log_tag = tag;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn log_path(&self) -> Option<&PathBuf> {
        self.log_path.as_ref()
    }

    pub fn log_tag(&self) -> Option<&str> {
        self.log_tag.as_deref()
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn run_at_startup(&self) -> bool {
        self.run_at_startup
    }

    /// The compile error for this rule's pattern, if any.
    pub fn pattern_error(&self) -> Option<&str> {
        self.matcher.as_ref().err().map(String::as_str)
    }

    /// Match the pattern against a base name (no directory components).
    ///
    /// A pattern that failed to compile is reported and never matches.
    pub fn matches(&self, base_name: &str) -> bool {
        match &self.matcher {
            Ok(m) => m.is_match(base_name),
            Err(err) => {
                error!(
                    pattern = %self.pattern,
                    file = %base_name,
                    error = %err,
                    "invalid glob pattern; treating as no match"
                );
                false
            }
        }
    }
}

fn compile_pattern(pattern: &str) -> Result<GlobMatcher, String> {
    Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|e| e.to_string())
}

/// Ordered, immutable set of watch rules.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<WatchRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<WatchRule>) -> Self {
        Self { rules }
    }

    /// Compile the rule table from a validated config.
    ///
    /// Broken patterns are warned about here once and then stay in the
    /// table so that the failure is visible every time they are evaluated.
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let rules = cfg
            .rules()
            .iter()
            .map(|w| {
                let mut rule = WatchRule::new(&w.pattern, &w.command)
                    .with_debounce(Duration::from_millis(w.delay))
                    .with_run_at_startup(w.start);
                if let Some(log) = &w.log {
                    rule = rule.with_log(log, w.log_tag.clone());
                }
                if let Some(err) = rule.pattern_error() {
                    warn!(pattern = %rule.pattern(), error = %err, "rule pattern does not compile");
                }
                rule
            })
            .collect();
        Self { rules }
    }

    pub fn iter(&self) -> impl Iterator<Item = &WatchRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All rules whose pattern matches `base_name`, in table order.
    pub fn matching(&self, base_name: &str) -> Vec<&WatchRule> {
        self.rules.iter().filter(|r| r.matches(base_name)).collect()
    }

    /// Rules flagged to run once when the process starts.
    pub fn startup_rules(&self) -> impl Iterator<Item = &WatchRule> {
        self.rules.iter().filter(|r| r.run_at_startup())
    }

    /// Rules with a log file to follow.
    pub fn logged_rules(&self) -> impl Iterator<Item = &WatchRule> {
        self.rules.iter().filter(|r| r.log_path().is_some())
    }
}
