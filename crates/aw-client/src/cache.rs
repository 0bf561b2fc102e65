//! Two-tier response cache
//!
//! Responses are kept in memory until [`ContentCache::flush`] writes them to
//! disk, one file per fingerprint. Lookups try memory first and then disk.
//! A disk hit is served without being copied back into memory, so a large
//! cache directory can be read through without growing the process.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::error::CacheError;
use crate::fingerprint::Fingerprint;
use crate::stats::CacheTier;

/// A cached payload and the tier it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHit {
    pub payload: Vec<u8>,
    pub tier: CacheTier,
}

/// Read-through cache for raw response payloads
#[derive(Debug)]
pub struct ContentCache {
    dir: PathBuf,
    memory: Mutex<HashMap<Fingerprint, Vec<u8>>>,
    enabled: AtomicBool,
    temp_seq: AtomicU64,
}

impl ContentCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            dir: config.dir,
            memory: Mutex::new(HashMap::new()),
            enabled: AtomicBool::new(config.enabled),
            temp_seq: AtomicU64::new(0),
        }
    }

    /// Directory flushed entries are written to
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File an entry is flushed to
    pub fn path_for(&self, key: &Fingerprint) -> PathBuf {
        self.dir.join(key.to_hex())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Entries waiting for the next flush
    pub fn memory_len(&self) -> usize {
        self.memory.lock().len()
    }

    /// Payload cached under `parts`
    pub fn get<S: AsRef<[u8]>>(&self, parts: &[S]) -> Option<Vec<u8>> {
        self.lookup(&Fingerprint::of(parts)).map(|hit| hit.payload)
    }

    /// Store `payload` under `parts` in the memory tier
    pub fn set<S: AsRef<[u8]>>(&self, parts: &[S], payload: Vec<u8>) {
        self.store(Fingerprint::of(parts), payload);
    }

    /// Look `key` up in memory, then on disk
    ///
    /// Misses when the cache is paused or disabled. Disk read errors other than
    /// a missing file are logged and treated as a miss.
    pub fn lookup(&self, key: &Fingerprint) -> Option<CacheHit> {
        if !self.is_enabled() {
            return None;
        }

        if let Some(payload) = self.memory.lock().get(key).cloned() {
            debug!("Cache hit (memory): {}", key);
            return Some(CacheHit {
                payload,
                tier: CacheTier::Memory,
            });
        }

        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(payload) => {
                debug!("Cache hit (disk): {}", key);
                Some(CacheHit {
                    payload,
                    tier: CacheTier::Disk,
                })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Cache miss: {}", key);
                None
            }
            Err(e) => {
                warn!("Failed to read cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Keep `payload` in memory under `key` until the next flush
    ///
    /// Ignored while the cache is paused or disabled.
    pub fn store(&self, key: Fingerprint, payload: Vec<u8>) {
        if !self.is_enabled() {
            debug!("Cache closed, not storing {}", key);
            return;
        }
        self.memory.lock().insert(key, payload);
    }

    /// Write every memory entry to disk and drop it from memory
    ///
    /// Stops at the first failure and returns it; that entry and any not yet
    /// written stay in memory. Returns the number of entries written.
    pub fn flush(&self) -> Result<usize, CacheError> {
        let pending: Vec<(Fingerprint, Vec<u8>)> = self
            .memory
            .lock()
            .iter()
            .map(|(key, payload)| (*key, payload.clone()))
            .collect();
        if pending.is_empty() {
            return Ok(0);
        }

        fs::create_dir_all(&self.dir).map_err(|e| CacheError::io(&self.dir, e))?;

        let mut written = 0;
        for (key, payload) in pending {
            self.write_entry(&key, &payload)?;

            let mut memory = self.memory.lock();
            // A concurrent store may have replaced the entry while it was written
            if memory.get(&key) == Some(&payload) {
                memory.remove(&key);
            }
            written += 1;
        }

        info!("Flushed {} cache entries to {}", written, self.dir.display());
        Ok(written)
    }

    fn write_entry(&self, key: &Fingerprint, payload: &[u8]) -> Result<(), CacheError> {
        let path = self.path_for(key);
        let seq = self.temp_seq.fetch_add(1, Ordering::Relaxed);
        let temp = self
            .dir
            .join(format!(".{}.{}.{}.tmp", key.to_hex(), std::process::id(), seq));

        if let Err(e) = fs::write(&temp, payload) {
            let _ = fs::remove_file(&temp);
            return Err(CacheError::io(temp, e));
        }
        if let Err(e) = fs::rename(&temp, &path) {
            let _ = fs::remove_file(&temp);
            return Err(CacheError::io(path, e));
        }
        debug!("Wrote cache file {}", path.display());
        Ok(())
    }

    /// Open the cache
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Release);
        info!("Response cache enabled ({})", self.dir.display());
    }

    /// Close the cache and discard unflushed entries
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
        let discarded = {
            let mut memory = self.memory.lock();
            let n = memory.len();
            memory.clear();
            n
        };
        info!("Response cache disabled, discarded {} unflushed entries", discarded);
    }

    /// Close the cache, keeping unflushed entries for a later resume or flush
    pub fn pause(&self) {
        self.enabled.store(false, Ordering::Release);
        info!("Response cache paused");
    }

    /// Reopen a paused cache
    pub fn resume(&self) {
        self.enabled.store(true, Ordering::Release);
        info!("Response cache resumed");
    }
}
