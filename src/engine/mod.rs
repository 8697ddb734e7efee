// src/engine/mod.rs

//! Orchestration engine for reloader.
//!
//! This module ties together:
//! - the pure core that turns a raw change notification into the set of
//!   commands to launch (change classification, rule matching, debounce)
//! - the async event loop that selects over watcher events and errors and
//!   hands launches to an executor
//! - the Ctrl-C handler
//!
//! The pure core lives in [`core`]; the async/IO shell is implemented in
//! [`runtime`].

use std::fmt;
use std::path::PathBuf;

/// Why a command is being launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// The rule is flagged to run once at startup.
    Startup,
    /// A file matching the rule changed.
    FileChange(PathBuf),
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Startup => f.write_str("startup"),
            Trigger::FileChange(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A single command launch decided by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    /// Pattern of the rule that produced this launch.
    pub pattern: String,
    /// Shell command line.
    pub command: String,
    pub trigger: Trigger,
}

pub mod core;
pub mod runtime;
pub mod shutdown;

pub use self::core::CoreRuntime;
pub use runtime::Runtime;
pub use shutdown::{spawn_shutdown_handler, FAREWELL};
