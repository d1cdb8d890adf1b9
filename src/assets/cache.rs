use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use uuid::Uuid;
use xxhash_rust::xxh3::xxh3_64;

#[derive(Debug, Clone)]
struct CacheEntry {
    path: PathBuf,
    hash: u64,
}

/// Counters describing how the cache served `put` calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Files written to disk.
    pub writes: usize,
    /// Calls answered from an existing entry without I/O.
    pub hits: usize,
    /// Entries whose content changed and were moved to a new file.
    pub replacements: usize,
    /// Calls that could not stage the asset.
    pub failures: usize,
}

// Internal data structure, protected by a lock.
#[derive(Default)]
struct CacheInner {
    entries: FxHashMap<String, CacheEntry>,
    stats: CacheStats,
}

/// Content-checked staging area for assets referenced by URI.
///
/// Each URI maps to one file below the cache root named
/// `<unique-id>_<file-name>`, so unrelated packages using the same file
/// name never collide. Entries live for the lifetime of the cache; there is
/// no on-disk index.
pub struct AssetCache {
    root: PathBuf,
    inner: Mutex<CacheInner>,
}

fn write_cache_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, bytes)
}

fn remove_cache_file(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        log::warn!("Failed to delete expired asset cache entry {}: {e}", path.display());
    }
}

impl AssetCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            inner: Mutex::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stages `bytes` for `uri` and returns the local file path.
    ///
    /// - Same URI, same content: the existing path is returned without I/O.
    /// - Same URI, new content: the old file is deleted and the content is
    ///   written to a fresh path.
    /// - Unknown URI: the content is written to a fresh path.
    ///
    /// Returns `None` when the asset could not be written; callers treat the
    /// asset as unavailable.
    pub fn put(&self, uri: &str, file_name: &str, bytes: &[u8]) -> Option<PathBuf> {
        let hash = xxh3_64(bytes);

        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let mut file_was_removed = false;
        if let Some(entry) = inner.entries.get(uri)
            && entry.hash == hash
        {
            if entry.path.exists() {
                inner.stats.hits += 1;
                return Some(entry.path.clone());
            }
            log::debug!(
                "Cached asset {} was removed externally, writing it again",
                entry.path.display()
            );
            file_was_removed = true;
        }

        let Some(name) = Path::new(file_name).file_name() else {
            log::warn!("Invalid file name '{file_name}', cannot cache the asset: {uri}");
            inner.stats.failures += 1;
            return None;
        };
        let new_path = self
            .root
            .join(format!("{}_{}", Uuid::new_v4().simple(), name.to_string_lossy()));

        if let Err(e) = write_cache_file(&new_path, bytes) {
            log::warn!("Failed to put asset into cache, skipping asset {}: {e}", new_path.display());
            inner.stats.failures += 1;
            return None;
        }
        inner.stats.writes += 1;

        let new_entry = CacheEntry {
            path: new_path.clone(),
            hash,
        };
        match inner.entries.entry(uri.to_string()) {
            Entry::Occupied(mut occupied) => {
                if !file_was_removed {
                    remove_cache_file(&occupied.get().path);
                    inner.stats.replacements += 1;
                }
                occupied.insert(new_entry);
            }
            Entry::Vacant(vacant) => {
                vacant.insert(new_entry);
            }
        }

        log::debug!("Cached asset {uri} at {}", new_path.display());
        Some(new_path)
    }

    /// Local path currently staged for `uri`.
    #[must_use]
    pub fn lookup(&self, uri: &str) -> Option<PathBuf> {
        self.inner.lock().entries.get(uri).map(|e| e.path.clone())
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("root", &self.root)
            .field("entries", &self.len())
            .finish()
    }
}
