// src/exec/log_follower.rs

//! `tail -f` for a rule's log file.
//!
//! A follower starts at the current end of the file, so history is not
//! replayed. If the file does not exist yet it is waited for and then read
//! from the beginning. Truncation and rotation are detected by polling and
//! the new file is read from its start.

use std::io::{ErrorKind, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncSeekExt, BufReader};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// How often to look for new data, a missing file, or rotation.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Spawn a follower that prints each new line of `path` to stdout.
///
/// Errors end this follower only; they are logged and nothing else is
/// affected.
pub fn spawn_log_follower(path: PathBuf, tag: Option<String>) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(path = ?path, "following log file");
        let emit = |line: String| println!("{line}");
        if let Err(err) = follow_log(&path, tag.as_deref(), POLL_INTERVAL, emit).await {
            error!(path = ?path, error = %err, "log follower stopped");
        }
    })
}

/// Follow `path` forever, calling `emit` with each complete new line.
///
/// Lines are prefixed with `[tag] ` when a tag is given. Only returns on an
/// I/O error other than the file being absent.
pub async fn follow_log<F>(path: &Path, tag: Option<&str>, poll: Duration, mut emit: F) -> Result<()>
where
    F: FnMut(String),
{
    let (file, existed) = wait_for_file(path, poll).await?;
    let mut reader = BufReader::new(file);
    let mut offset = if existed {
        reader.seek(SeekFrom::End(0)).await?
    } else {
        0
    };
    let mut identity = file_identity(&reader.get_ref().metadata().await?);
    let mut pending: Vec<u8> = Vec::new();

    loop {
        let n = reader
            .read_until(b'\n', &mut pending)
            .await
            .with_context(|| format!("reading log file {:?}", path))?;

        if n > 0 {
            offset += n as u64;
            if pending.ends_with(b"\n") {
                emit(format_line(tag, &pending));
                pending.clear();
            }
            continue;
        }

        sleep(poll).await;

        if is_replaced(path, offset, identity).await {
            debug!(path = ?path, "log file truncated or rotated; reopening");
            let (file, _) = wait_for_file(path, poll).await?;
            identity = file_identity(&file.metadata().await?);
            reader = BufReader::new(file);
            offset = 0;
            pending.clear();
        }
    }
}

fn format_line(tag: Option<&str>, raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim_end_matches(['\n', '\r']);
    match tag {
        Some(tag) => format!("[{tag}] {text}"),
        None => text.to_string(),
    }
}

/// Open `path`, polling while it does not exist.
///
/// The flag is false when the file had to be waited for.
async fn wait_for_file(path: &Path, poll: Duration) -> Result<(File, bool)> {
    let mut existed = true;
    loop {
        match File::open(path).await {
            Ok(f) => return Ok((f, existed)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                existed = false;
                sleep(poll).await;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("opening log file {:?}", path));
            }
        }
    }
}

/// Whether the file at `path` is no longer the one being read.
async fn is_replaced(path: &Path, offset: u64, identity: Option<(u64, u64)>) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.len() < offset || file_identity(&meta) != identity,
        // Moved away; wait for the replacement.
        Err(_) => true,
    }
}

#[cfg(unix)]
fn file_identity(meta: &std::fs::Metadata) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;
    Some((meta.dev(), meta.ino()))
}

#[cfg(not(unix))]
fn file_identity(_meta: &std::fs::Metadata) -> Option<(u64, u64)> {
    None
}
