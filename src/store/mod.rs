//! Per-series persistence with a session-scoped read cache.
//!
//! Each series lives in `<data_dir>/<lowercase id>.parquet`. Writes replace the
//! whole file: the new content goes to a temporary sibling first and is then
//! renamed over the old file, so a reader never observes a half-written file.
//!
//! The cache is an explicit value owned by whoever owns the store (a CLI run,
//! a test), not process-global state. Two stores built with different caches
//! never see each other's entries.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use tracing::debug;

use crate::domain::TimeSeries;
use crate::error::DataError;

pub mod parquet;

const FILE_EXTENSION: &str = "parquet";

/// Loaded series keyed by canonical (upper-case) identifier.
///
/// A hit always holds a fully decoded series; only successful loads and
/// writes populate it.
#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: RwLock<HashMap<String, Arc<TimeSeries>>>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn get(&self, key: &str) -> Option<Arc<TimeSeries>> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn insert(&self, key: String, series: Arc<TimeSeries>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key, series);
        }
    }

    fn invalidate(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Summary of one persisted series, for status listings.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSeriesInfo {
    pub id: String,
    pub n_obs: usize,
    pub first: Option<chrono::NaiveDate>,
    pub last: Option<chrono::NaiveDate>,
}

pub struct SeriesStore {
    data_dir: PathBuf,
    cache: Arc<SeriesCache>,
    write_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SeriesStore {
    /// Open a store rooted at `data_dir` with a fresh cache.
    pub fn open(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_cache(data_dir, Arc::new(SeriesCache::new()))
    }

    /// Open a store that shares `cache` with its caller.
    pub fn with_cache(data_dir: impl Into<PathBuf>, cache: Arc<SeriesCache>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache,
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn cache(&self) -> &Arc<SeriesCache> {
        &self.cache
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{FILE_EXTENSION}", id.to_lowercase()))
    }

    /// Persist `series` as the full content for `id`, replacing any previous file.
    pub fn write(&self, id: &str, series: &TimeSeries) -> Result<(), DataError> {
        let key = canonical(id);
        let lock = self.write_lock(&key)?;
        let _guard = lock
            .lock()
            .map_err(|_| DataError::storage(&key, "write lock poisoned"))?;

        fs::create_dir_all(&self.data_dir).map_err(|e| {
            DataError::storage(
                &key,
                format!("failed to create data dir '{}': {e}", self.data_dir.display()),
            )
        })?;

        let path = self.path_for(&key);
        let tmp = path.with_extension(format!("{FILE_EXTENSION}.tmp"));
        parquet::write_file(&tmp, series).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            DataError::storage(&key, e)
        })?;
        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            DataError::storage(&key, format!("failed to replace '{}': {e}", path.display()))
        })?;

        self.cache.invalidate(&key);
        debug!(series = %key, path = %path.display(), n_obs = series.len(), "series written");
        Ok(())
    }

    /// Load the persisted series for `id`.
    ///
    /// Returns `Ok(None)` when no file exists and `Ok(Some(empty))` when the
    /// file exists but holds no rows. Decoding failures are errors.
    pub fn read(&self, id: &str) -> Result<Option<Arc<TimeSeries>>, DataError> {
        let key = canonical(id);
        if let Some(hit) = self.cache.get(&key) {
            debug!(series = %key, "cache hit");
            return Ok(Some(hit));
        }

        // Miss path runs under the per-id write lock: no write can land
        // between decode and insert.
        let lock = self.write_lock(&key)?;
        let _guard = lock
            .lock()
            .map_err(|_| DataError::storage(&key, "write lock poisoned"))?;
        if let Some(hit) = self.cache.get(&key) {
            return Ok(Some(hit));
        }

        let path = self.path_for(&key);
        if !path.is_file() {
            debug!(series = %key, path = %path.display(), "no stored file");
            return Ok(None);
        }

        let series = Arc::new(parquet::read_file(&path).map_err(|e| DataError::storage(&key, e))?);
        debug!(series = %key, n_obs = series.len(), "series loaded");
        self.cache.insert(key, Arc::clone(&series));
        Ok(Some(series))
    }

    /// Like [`read`](Self::read), but a missing file is an error.
    pub fn require(&self, id: &str) -> Result<Arc<TimeSeries>, DataError> {
        self.read(id)?.ok_or_else(|| DataError::MissingSeries { series: canonical(id) })
    }

    /// Identifiers (upper-case) of every persisted series, sorted.
    pub fn list(&self) -> Result<Vec<String>, DataError> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(DataError::storage(
                    "*",
                    format!("failed to list '{}': {e}", self.data_dir.display()),
                ));
            }
        };

        let mut ids = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(FILE_EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(canonical(stem));
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Observation count and date range of a persisted series.
    pub fn info(&self, id: &str) -> Result<Option<StoredSeriesInfo>, DataError> {
        Ok(self.read(id)?.map(|ts| StoredSeriesInfo {
            id: canonical(id),
            n_obs: ts.len(),
            first: ts.first_date(),
            last: ts.last_date(),
        }))
    }

    fn write_lock(&self, key: &str) -> Result<Arc<Mutex<()>>, DataError> {
        let mut locks = self
            .write_locks
            .lock()
            .map_err(|_| DataError::storage(key, "lock table poisoned"))?;
        Ok(Arc::clone(locks.entry(key.to_string()).or_default()))
    }
}

fn canonical(id: &str) -> String {
    id.trim().to_uppercase()
}
