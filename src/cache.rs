//! File-backed response cache
//!
//! A key → bytes store with per-entry expiration. The whole store is loaded
//! into memory once and written back in full by [`ResponseCache::save`]; `set`
//! never touches the disk. The file is replaced atomically (temp file +
//! rename), so a crash loses at most the unsaved writes.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{CACHE_CLEANUP_INTERVAL, DEFAULT_CACHE_TTL};
use crate::error::CacheError;

/// Contents written to a freshly created cache file
const PLACEHOLDER: &[u8] = b"{}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

pub struct ResponseCache {
    path: PathBuf,
    entries: HashMap<String, CacheEntry>,
    default_ttl: Duration,
    cleanup_interval: Duration,
    last_sweep: DateTime<Utc>,
    degraded: bool,
}

impl ResponseCache {
    /// Open the cache file at `path`, creating the directory and an empty file if needed.
    ///
    /// Failing to create either is an error. A file that can't be read or
    /// decoded is not: the cache starts empty with the default TTL instead.
    pub fn initialize(path: &Path, default_ttl: Duration) -> Result<Self, CacheError> {
        info!("Initializing response cache at {:?}", path);

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| CacheError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        if !path.exists() {
            debug!("Cache file missing, creating placeholder");
            fs::write(path, PLACEHOLDER).map_err(|source| CacheError::CreateFile {
                path: path.to_path_buf(),
                source,
            })?;
        }

        let now = Utc::now();

        match Self::load(path, now) {
            Ok(entries) => {
                debug!("Loaded {} cache entries", entries.len());
                Ok(Self::with_entries(path, entries, default_ttl, false))
            }
            Err(e) => {
                warn!("{}, starting with an empty cache", e);
                Ok(Self::with_entries(
                    path,
                    HashMap::new(),
                    DEFAULT_CACHE_TTL,
                    true,
                ))
            }
        }
    }

    fn with_entries(
        path: &Path,
        entries: HashMap<String, CacheEntry>,
        default_ttl: Duration,
        degraded: bool,
    ) -> Self {
        Self {
            path: path.to_path_buf(),
            entries,
            default_ttl,
            cleanup_interval: CACHE_CLEANUP_INTERVAL,
            last_sweep: Utc::now(),
            degraded,
        }
    }

    fn load(path: &Path, now: DateTime<Utc>) -> Result<HashMap<String, CacheEntry>, CacheError> {
        let data = fs::read(path).map_err(|source| CacheError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let entries: HashMap<String, CacheEntry> =
            serde_json::from_slice(&data).map_err(|source| CacheError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(entries
            .into_iter()
            .filter(|(_, entry)| entry.is_live(now))
            .collect())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// True when the backing file could not be decoded and the cache started empty
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.entries.values().filter(|e| e.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached bytes for `key`, or `None` when absent or expired
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.get_at(key, Utc::now())
    }

    fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<&[u8]> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.as_slice())
    }

    /// Insert or overwrite `key` in memory; call [`save`](Self::save) to persist it
    pub fn set(&mut self, key: &str, value: Vec<u8>, ttl: Duration) {
        let now = Utc::now();
        self.sweep_if_due(now);

        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.entries
            .insert(key.to_string(), CacheEntry { value, expires_at });
    }

    /// [`set`](Self::set) with the cache's default TTL
    pub fn set_default(&mut self, key: &str, value: Vec<u8>) {
        self.set(key, value, self.default_ttl);
    }

    fn sweep_if_due(&mut self, now: DateTime<Utc>) {
        let due = now
            .signed_duration_since(self.last_sweep)
            .to_std()
            .is_ok_and(|elapsed| elapsed >= self.cleanup_interval);

        if due {
            self.sweep_expired(now);
        }
    }

    fn sweep_expired(&mut self, now: DateTime<Utc>) {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        self.last_sweep = now;
        debug!("Swept {} expired cache entries", before - self.entries.len());
    }

    /// Write every live entry to the backing file, replacing it atomically
    pub fn save(&mut self) -> Result<(), CacheError> {
        self.sweep_expired(Utc::now());

        let data = serde_json::to_vec(&self.entries).map_err(CacheError::Encode)?;

        let temp_path = self.path.with_extension("tmp");
        let write_err = |source| CacheError::Write {
            path: self.path.clone(),
            source,
        };

        let mut file = fs::File::create(&temp_path).map_err(write_err)?;
        file.write_all(&data).map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        fs::rename(&temp_path, &self.path).map_err(write_err)?;

        debug!("Saved {} cache entries to {:?}", self.entries.len(), self.path);
        Ok(())
    }
}

/// Lazily initialized cache owned by a command context.
///
/// The file is read on the first [`get_or_init`](Self::get_or_init) and never
/// again; later calls hand out the same store.
pub enum CacheHandle {
    Disabled,
    Uninitialized { path: PathBuf, ttl: Duration },
    Ready(ResponseCache),
}

impl CacheHandle {
    pub fn new(path: PathBuf, ttl: Duration) -> Self {
        CacheHandle::Uninitialized { path, ttl }
    }

    pub fn disabled() -> Self {
        CacheHandle::Disabled
    }

    /// The cache, initializing it on first use. `None` when caching is disabled.
    pub fn get_or_init(&mut self) -> Result<Option<&mut ResponseCache>, CacheError> {
        if let CacheHandle::Uninitialized { path, ttl } = self {
            let cache = ResponseCache::initialize(path, *ttl)?;
            *self = CacheHandle::Ready(cache);
        }

        match self {
            CacheHandle::Ready(cache) => Ok(Some(cache)),
            _ => Ok(None),
        }
    }
}
