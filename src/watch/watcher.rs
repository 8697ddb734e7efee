// src/watch/watcher.rs

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use notify::event::{CreateKind, ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;

/// Coarse event kind as seen by the event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// File content may have changed (written, or created).
    Modify,
    /// Anything else: access, removal, rename bookkeeping, metadata.
    Other,
}

/// A single (path, kind) notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl RawEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn modify(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ChangeKind::Modify)
    }
}

/// Map a `notify` event kind onto [`ChangeKind`].
///
/// File creation counts as a modification. So does the destination side of
/// a rename: editors that save atomically write a temporary file and rename
/// it over the original, which inotify reports as `Name(To)` or `Name(Both)`.
/// The fingerprint store decides whether the content really moved.
pub fn classify(kind: &EventKind) -> ChangeKind {
    match kind {
        EventKind::Create(CreateKind::Folder) => ChangeKind::Other,
        EventKind::Create(_) => ChangeKind::Modify,
        EventKind::Modify(ModifyKind::Name(RenameMode::To | RenameMode::Both)) => {
            ChangeKind::Modify
        }
        EventKind::Modify(ModifyKind::Name(_)) | EventKind::Modify(ModifyKind::Metadata(_)) => {
            ChangeKind::Other
        }
        EventKind::Modify(_) => ChangeKind::Modify,
        _ => ChangeKind::Other,
    }
}

/// Paths of `event` worth reporting.
///
/// A `Name(Both)` rename carries `[from, to]`; the source no longer exists,
/// so only the destination is kept.
fn reported_paths(event: Event) -> Vec<PathBuf> {
    let mut paths = event.paths;
    if event.kind == EventKind::Modify(ModifyKind::Name(RenameMode::Both)) && paths.len() == 2 {
        paths.remove(0);
    }
    paths
}

/// Folder names excluded from watching, resolved against the watch root.
#[derive(Debug, Clone)]
pub struct SkipList {
    root: PathBuf,
    folders: HashSet<String>,
}

impl SkipList {
    pub fn new(root: impl Into<PathBuf>, folders: &[String]) -> Self {
        Self {
            root: root.into(),
            folders: folders.iter().cloned().collect(),
        }
    }

    /// True if any directory component of `path` (below the root) is a
    /// skipped folder name.
    pub fn is_skipped(&self, path: &Path) -> bool {
        if self.folders.is_empty() {
            return false;
        }
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        let mut components = rel.components().peekable();
        while let Some(component) = components.next() {
            // The last component is the file itself, not a folder.
            if components.peek().is_none() {
                break;
            }
            if let Component::Normal(name) = component {
                if self.folders.contains(name.to_string_lossy().as_ref()) {
                    return true;
                }
            }
        }
        false
    }
}

/// The two output sequences of the watcher.
#[derive(Debug)]
pub struct WatchStreams {
    pub events: mpsc::UnboundedReceiver<RawEvent>,
    pub errors: mpsc::UnboundedReceiver<notify::Error>,
}

/// Turns raw `notify` callbacks into [`RawEvent`]s and errors.
///
/// Skipped folders are filtered here, so events below them never reach
/// the event loop.
#[derive(Debug, Clone)]
pub struct EventForwarder {
    skip: SkipList,
    events: mpsc::UnboundedSender<RawEvent>,
    errors: mpsc::UnboundedSender<notify::Error>,
}

impl EventForwarder {
    /// Create a forwarder together with the receiving ends.
    pub fn channel(skip: SkipList) -> (Self, WatchStreams) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (errors_tx, errors_rx) = mpsc::unbounded_channel();
        let forwarder = Self {
            skip,
            events: events_tx,
            errors: errors_tx,
        };
        let streams = WatchStreams {
            events: events_rx,
            errors: errors_rx,
        };
        (forwarder, streams)
    }

    pub fn forward(&self, res: notify::Result<Event>) {
        match res {
            Ok(event) => {
                let kind = classify(&event.kind);
                for path in reported_paths(event) {
                    if self.skip.is_skipped(&path) {
                        continue;
                    }
                    if let Err(err) = self.events.send(RawEvent::new(path, kind)) {
                        // Called on notify's thread; tracing may not be set up for it.
                        eprintln!("reloader: failed to forward notify event: {err}");
                    }
                }
            }
            Err(err) => {
                if let Err(err) = self.errors.send(err) {
                    eprintln!("reloader: failed to forward watch error: {}", err.0);
                }
            }
        }
    }
}

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Start watching `root` recursively, excluding `skip_folders`.
///
/// Returns the watcher handle (keep it alive) and the event/error streams
/// the event loop selects over.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    skip_folders: &[String],
) -> Result<(WatcherHandle, WatchStreams)> {
    let root = root.into();
    // Canonicalize once so we have a stable base path.
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    let (forwarder, streams) = EventForwarder::channel(SkipList::new(&root, skip_folders));

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| forwarder.forward(res),
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);
    debug!(?skip_folders, "skipping folders");

    Ok((WatcherHandle { _inner: watcher }, streams))
}
