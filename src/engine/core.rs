// src/engine/core.rs

//! Pure core of the event loop.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RawEvent`]s and produces the list of [`Dispatch`]es the IO
//! shell should launch.
//!
//! The core exclusively owns the fingerprint store and the debounce state;
//! nothing else reads or writes them, so neither needs locking. Time is
//! passed in by the caller, which keeps debounce behaviour testable.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::engine::{Dispatch, Trigger};
use crate::watch::{ChangeKind, DebounceGate, FingerprintStore, RawEvent, RuleTable};

#[derive(Debug)]
pub struct CoreRuntime {
    rules: Arc<RuleTable>,
    fingerprints: FingerprintStore,
    debounce: DebounceGate,
}

impl CoreRuntime {
    pub fn new(rules: Arc<RuleTable>, fingerprints: FingerprintStore) -> Self {
        Self {
            rules,
            fingerprints,
            debounce: DebounceGate::new(),
        }
    }

    /// Launches for every rule flagged to run at startup.
    ///
    /// These bypass fingerprints and do not touch the debounce state.
    pub fn startup(&self) -> Vec<Dispatch> {
        self.rules
            .startup_rules()
            .map(|rule| Dispatch {
                pattern: rule.pattern().to_string(),
                command: rule.command().to_string(),
                trigger: Trigger::Startup,
            })
            .collect()
    }

    /// Handle one watcher notification.
    ///
    /// Only modify events are considered. The file is fingerprinted once,
    /// and only when at least one rule matches its base name; each matching
    /// rule is then gated by its own debounce entry.
    pub fn handle_event(&mut self, event: &RawEvent, now: Instant) -> Vec<Dispatch> {
        if event.kind != ChangeKind::Modify {
            return Vec::new();
        }

        let Some(base_name) = event.path.file_name().map(|n| n.to_string_lossy()) else {
            return Vec::new();
        };

        let matched = self.rules.matching(&base_name);
        if matched.is_empty() {
            return Vec::new();
        }

        if !self.fingerprints.observe(&event.path) {
            return Vec::new();
        }

        let mut dispatches = Vec::new();
        for rule in matched {
            info!(path = ?event.path, pattern = %rule.pattern(), "file changed");
            if self.debounce.allow(rule, now) {
                dispatches.push(Dispatch {
                    pattern: rule.pattern().to_string(),
                    command: rule.command().to_string(),
                    trigger: Trigger::FileChange(event.path.clone()),
                });
            } else {
                debug!(
                    pattern = %rule.pattern(),
                    delay_ms = rule.debounce().as_millis() as u64,
                    "within debounce window; not running"
                );
            }
        }
        dispatches
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn fingerprints(&self) -> &FingerprintStore {
        &self.fingerprints
    }
}
