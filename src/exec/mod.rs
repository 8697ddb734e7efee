// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the commands defined in
//! the rules, using `tokio::process::Command`, and for echoing followed log
//! files.
//!
//! - [`command`] runs one shell command with inherited stdio and logs how it
//!   ended.
//! - [`backend`] provides the `ExecutorBackend` trait and the concrete
//!   `RealExecutorBackend` that the runtime uses in production, and which
//!   tests can replace with a fake implementation.
//! - [`log_follower`] tails a rule's log file onto stdout.

pub mod backend;
pub mod command;
pub mod log_follower;

pub use backend::{ExecutorBackend, RealExecutorBackend};
pub use command::{run_command, shell_command, spawn_command};
pub use log_follower::{follow_log, spawn_log_follower};
