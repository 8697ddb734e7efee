// src/watch/fingerprint.rs

//! Content fingerprints for changed files.
//!
//! Editors often emit modify events for saves that leave the bytes
//! untouched, or for metadata-only updates. Comparing a content digest
//! against the last one seen for the same path filters those out.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use blake3::{Hash, Hasher};
use tracing::{debug, warn};

use crate::fs::{FileSystem, RealFileSystem};

/// Compute the digest of a single file.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<Hash> {
    let mut hasher = Hasher::new();
    let mut file = fs.open_read(path)?;
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hasher.finalize())
}

/// Last observed digest per absolute path.
///
/// Owned by the event loop; entries are replaced on change and never
/// removed, so the map grows with the number of distinct files touched.
#[derive(Debug)]
pub struct FingerprintStore {
    fs: Arc<dyn FileSystem>,
    digests: HashMap<PathBuf, Hash>,
}

impl Default for FingerprintStore {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem))
    }
}

impl FingerprintStore {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            digests: HashMap::new(),
        }
    }

    /// Re-read `path` and report whether its content differs from the last
    /// observation.
    ///
    /// - never seen before: store the digest, return `true`
    /// - same digest: return `false`
    /// - different digest: store it, return `true`
    /// - read failure: log, leave the store untouched, return `false`
    pub fn observe(&mut self, path: &Path) -> bool {
        let digest = match compute_file_hash(self.fs.as_ref(), path) {
            Ok(d) => d,
            Err(err) => {
                warn!(path = ?path, error = %err, "could not fingerprint file; ignoring change");
                return false;
            }
        };

        match self.digests.get(path) {
            Some(old) if *old == digest => {
                debug!(path = ?path, "content unchanged");
                false
            }
            _ => {
                self.digests.insert(path.to_path_buf(), digest);
                true
            }
        }
    }

    /// The stored digest for `path`, if it has been observed successfully.
    pub fn digest(&self, path: &Path) -> Option<&Hash> {
        self.digests.get(path)
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}
