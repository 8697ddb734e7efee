// src/watch/debounce.rs

//! Per-rule cooldown between command launches.

use std::collections::HashMap;
use std::time::Instant;

use crate::watch::rules::WatchRule;

/// Last launch time per rule, keyed by the rule's pattern string.
///
/// Keying by pattern means two rules with an identical pattern share one
/// timer.
#[derive(Debug, Default)]
pub struct DebounceGate {
    last_launch: HashMap<String, Instant>,
}

impl DebounceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `rule` may launch at `now`, recording `now` as its
    /// last launch when it may.
    ///
    /// A rule that never launched is always allowed. Otherwise it is allowed
    /// once `now >= last + debounce` (the boundary itself is allowed).
    pub fn allow(&mut self, rule: &WatchRule, now: Instant) -> bool {
        if let Some(last) = self.last_launch.get(rule.pattern()) {
            // A window too long to represent never ends.
            match last.checked_add(rule.debounce()) {
                Some(until) if now >= until => {}
                _ => return false,
            }
        }
        self.last_launch.insert(rule.pattern().to_string(), now);
        true
    }

    pub fn last_launch(&self, pattern: &str) -> Option<Instant> {
        self.last_launch.get(pattern).copied()
    }
}
