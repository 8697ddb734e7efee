// src/exec/command.rs

use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::engine::Dispatch;

/// Build a shell command appropriate for the platform.
///
/// The command line is handed to the shell verbatim, so pipes, redirection
/// and builtins work. Configuration is trusted input.
pub fn shell_command(command_line: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command_line);
        c
    }
}

/// Launch a dispatched command in the background.
///
/// The returned handle may be dropped; the command keeps running and its
/// outcome is logged. Children are not killed when this process exits.
pub fn spawn_command(dispatch: Dispatch) -> JoinHandle<()> {
    info!(pattern = %dispatch.pattern, cmd = %dispatch.command, trigger = %dispatch.trigger, "running command");
    tokio::spawn(async move {
        match run_command(&dispatch).await {
            Ok(status) if status.success() => {
                info!(pattern = %dispatch.pattern, trigger = %dispatch.trigger, "command finished");
            }
            Ok(status) => {
                error!(
                    pattern = %dispatch.pattern,
                    trigger = %dispatch.trigger,
                    exit_code = status.code().unwrap_or(-1),
                    "command failed"
                );
            }
            Err(err) => {
                error!(
                    pattern = %dispatch.pattern,
                    trigger = %dispatch.trigger,
                    error = %err,
                    "command could not be run"
                );
            }
        }
    })
}

/// Run a dispatched command to completion, sharing this process's
/// stdin/stdout/stderr.
pub async fn run_command(dispatch: &Dispatch) -> Result<ExitStatus> {
    let mut cmd = shell_command(&dispatch.command);
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(false);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning `{}` for pattern '{}'", dispatch.command, dispatch.pattern))?;

    child
        .wait()
        .await
        .with_context(|| format!("waiting for `{}`", dispatch.command))
}
