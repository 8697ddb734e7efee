// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime talks to an `ExecutorBackend` instead of spawning processes
//! itself. This makes it easy to swap in a fake executor in tests while
//! keeping the production implementation in [`command`](super::command).

use std::future::Future;
use std::pin::Pin;

use crate::engine::Dispatch;
use crate::errors::Result;

use super::command::spawn_command;

/// Trait abstracting how dispatched commands are executed.
///
/// Implementations must not wait for the commands to finish: the event loop
/// awaits `dispatch` and would otherwise stall on long-running commands.
pub trait ExecutorBackend: Send {
    fn dispatch(
        &mut self,
        dispatches: Vec<Dispatch>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real executor backend used in production.
///
/// Every dispatch becomes its own Tokio task running a shell process.
/// Those tasks are not tracked; see [`spawn_command`].
#[derive(Debug, Default)]
pub struct RealExecutorBackend;

impl RealExecutorBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ExecutorBackend for RealExecutorBackend {
    fn dispatch(
        &mut self,
        dispatches: Vec<Dispatch>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            for dispatch in dispatches {
                spawn_command(dispatch);
            }
            Ok(())
        })
    }
}
