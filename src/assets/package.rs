use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::errors::{Error, Result};

/// Whether a lookup was served from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

struct PackageEntry<T> {
    modified: SystemTime,
    value: Arc<T>,
}

/// Loaded rule packages keyed by file path.
///
/// An entry is reused while the package file's modification time is
/// unchanged; editing the package on disk forces a reload on the next
/// lookup.
pub struct PackageCache<T> {
    entries: Mutex<FxHashMap<PathBuf, PackageEntry<T>>>,
}

impl<T> Default for PackageCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PackageCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::default(),
        }
    }

    /// Returns the package at `path`, loading it with `load` on a miss.
    pub fn get<F>(&self, path: &Path, load: F) -> Result<(Arc<T>, CacheStatus)>
    where
        F: FnOnce(&Path) -> Result<T>,
    {
        let mut entries = self.entries.lock();

        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|e| Error::PackageNotFound(format!("{}: {e}", path.display())))?;

        if let Some(entry) = entries.get(path) {
            if entry.modified == modified {
                return Ok((Arc::clone(&entry.value), CacheStatus::Hit));
            }
            log::debug!("Package change detected, reloading {}", path.display());
        }

        let value = Arc::new(load(path)?);
        entries.insert(
            path.to_path_buf(),
            PackageEntry {
                modified,
                value: Arc::clone(&value),
            },
        );
        Ok((value, CacheStatus::Miss))
    }

    /// Drops the entry for `path`, if any.
    pub fn invalidate(&self, path: &Path) -> bool {
        self.entries.lock().remove(path).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
