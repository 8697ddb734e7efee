// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod watch;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_and_validate, ConfigFile};
use crate::engine::{spawn_shutdown_handler, CoreRuntime, Runtime};
use crate::errors::{ReloaderError, Result};
use crate::exec::{spawn_log_follower, RealExecutorBackend};
use crate::watch::{spawn_watcher, FingerprintStore, RuleTable};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the rule table
/// - the file watcher
/// - log followers
/// - Ctrl-C handling
/// - the event loop (which also launches the startup rules)
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    logging::log_open_file_limit();
    info!(skip_folders = ?cfg.skip_folders(), "skip folders");

    let root = match args.root {
        Some(ref root) => PathBuf::from(root),
        None => config_root_dir(&config_path)?,
    };

    let rules = Arc::new(RuleTable::from_config(&cfg));

    // Keep the handle alive for as long as the runtime runs.
    let (_watcher, streams) = spawn_watcher(root, cfg.skip_folders())?;

    spawn_shutdown_handler();

    for rule in rules.logged_rules() {
        if let Some(path) = rule.log_path() {
            spawn_log_follower(path.clone(), rule.log_tag().map(str::to_string));
        }
    }

    let core = CoreRuntime::new(Arc::clone(&rules), FingerprintStore::default());
    let runtime = Runtime::new(core, streams, RealExecutorBackend::new());
    runtime.run().await;

    Ok(())
}

/// Figure out the directory tree to watch.
///
/// - If the config path has a non-empty parent (e.g. "configs/Reloader.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Reloader.toml" (parent = ""),
///   we use the current working directory.
fn config_root_dir(config_path: &Path) -> Result<PathBuf> {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
        _ => std::env::current_dir().map_err(ReloaderError::WorkingDir),
    }
}

/// Simple dry-run output: print skip folders and rules.
fn print_dry_run(cfg: &ConfigFile) {
    let rules = RuleTable::from_config(cfg);

    println!("reloader dry-run");
    println!("  skip.folders = {:?}", cfg.skip_folders());
    println!();

    println!("rules ({}):", rules.len());
    for rule in rules.iter() {
        println!("  - {}", rule.pattern());
        println!("      command: {}", rule.command());
        if !rule.debounce().is_zero() {
            println!("      delay: {}ms", rule.debounce().as_millis());
        }
        if rule.run_at_startup() {
            println!("      start: true");
        }
        if let Some(log) = rule.log_path() {
            println!("      log: {}", log.display());
        }
        if let Some(err) = rule.pattern_error() {
            println!("      pattern error: {err}");
        }
    }

    debug!("dry-run complete (no execution)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_config_parent_when_present() -> Result<()> {
        assert_eq!(
            config_root_dir(Path::new("configs/Reloader.toml"))?,
            PathBuf::from("configs")
        );
        Ok(())
    }

    #[test]
    fn root_is_cwd_for_bare_file_name() -> Result<()> {
        assert_eq!(config_root_dir(Path::new("Reloader.toml"))?, std::env::current_dir()?);
        Ok(())
    }
}
