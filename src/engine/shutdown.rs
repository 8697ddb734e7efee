// src/engine/shutdown.rs

//! Ctrl-C handling.
//!
//! Exit is immediate: running commands are not waited for or killed, and
//! may outlive this process.

use tokio::task::JoinHandle;
use tracing::warn;

/// Printed to stdout right before exiting on Ctrl-C.
pub const FAREWELL: &str = " Auf Wiederschaun!";

/// Spawn a task that exits the process with code 0 on Ctrl-C.
pub fn spawn_shutdown_handler() -> JoinHandle<()> {
    tokio::spawn(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            return;
        }
        println!("{FAREWELL}");
        std::process::exit(0);
    })
}
