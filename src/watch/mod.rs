// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling each rule's glob pattern and matching base names (`rules`).
//! - Fingerprinting file contents to drop no-op saves (`fingerprint`).
//! - Rate-limiting launches per rule (`debounce`).
//! - Wiring up a cross-platform filesystem watcher (`notify`) that honours
//!   the skip-folder list (`watcher`).
//!
//! It does **not** spawn processes; the engine decides what to run and
//! hands that to the executor.

pub mod debounce;
pub mod fingerprint;
pub mod rules;
pub mod watcher;

pub use debounce::DebounceGate;
pub use fingerprint::{compute_file_hash, FingerprintStore};
pub use rules::{RuleTable, WatchRule};
pub use watcher::{
    classify, spawn_watcher, ChangeKind, EventForwarder, RawEvent, SkipList, WatchStreams,
    WatcherHandle,
};
