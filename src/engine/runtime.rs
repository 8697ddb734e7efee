// src/engine/runtime.rs

use std::fmt;

use tracing::{debug, error, info};

use crate::exec::ExecutorBackend;
use crate::watch::WatchStreams;

use super::core::CoreRuntime;
use super::Dispatch;

/// Drives the core in response to watcher events, and delegates actual
/// command execution to an `ExecutorBackend`.
///
/// This is a pure IO shell around `CoreRuntime`. It selects over the
/// watcher's event and error streams; neither stream is given priority.
pub struct Runtime<E: ExecutorBackend> {
    core: CoreRuntime,
    streams: WatchStreams,
    executor: E,
}

impl<E: ExecutorBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(core: CoreRuntime, streams: WatchStreams, executor: E) -> Self {
        Self {
            core,
            streams,
            executor,
        }
    }

    /// Main event loop.
    ///
    /// - Launches the startup rules.
    /// - Feeds every watcher event into the core and dispatches the result.
    /// - Logs watcher errors and keeps going.
    ///
    /// Only returns once both streams are closed, which means the watcher
    /// was dropped. In normal operation the process ends through the
    /// Ctrl-C handler instead.
    pub async fn run(mut self) {
        info!(rules = self.core.rules().len(), "reloader runtime started");

        let startup = self.core.startup();
        self.dispatch(startup).await;

        loop {
            tokio::select! {
                Some(event) = self.streams.events.recv() => {
                    debug!(?event, "runtime received event");
                    let now = tokio::time::Instant::now().into_std();
                    let dispatches = self.core.handle_event(&event, now);
                    self.dispatch(dispatches).await;
                }
                Some(err) = self.streams.errors.recv() => {
                    error!(error = %err, paths = ?err.paths, "file watch error");
                }
                else => {
                    info!("watch streams closed; exiting");
                    break;
                }
            }
        }

        info!("runtime exiting");
    }

    async fn dispatch(&mut self, dispatches: Vec<Dispatch>) {
        if dispatches.is_empty() {
            return;
        }

        let patterns: Vec<_> = dispatches.iter().map(|d| d.pattern.as_str()).collect();
        debug!(?patterns, "dispatching commands");

        if let Err(err) = self.executor.dispatch(dispatches).await {
            error!(error = %err, "failed to hand commands to executor");
        }
    }
}
