//! JSON-file durable store.
//!
//! The whole map lives in memory and is rewritten to a single JSON object file on every
//! insert (temp file, `fsync`, rename). Writers are serialized so two concurrent inserts
//! can never persist snapshots that each miss the other's record.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{Instrument, debug, error, info, instrument};

use super::error::{StorageError, StorageResult};
use super::model::ShaderRecord;

const TEMP_SUFFIX: &str = ".tmp";

const EMPTY_STORE: &[u8] = b"{}";

/// Durable id → [`ShaderRecord`] mapping backed by one JSON file.
///
/// Invariant: the in-memory map always equals the last successfully persisted file
/// content. A record becomes visible to readers only after the file holding it has been
/// renamed into place.
pub struct DurableStore {
    inner: Arc<Inner>,
}

struct Inner {
    path: PathBuf,
    records: RwLock<HashMap<String, ShaderRecord>>,
    writer: Mutex<()>,
}

impl DurableStore {
    /// Loads the store file at `path`, creating it (and its parent directories) if missing.
    ///
    /// A missing or empty file yields an empty store. A file that is not a JSON object of
    /// records is rejected with [`StorageError::Corrupt`] rather than overwritten.
    pub async fn open(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let load_path = path.clone();

        let records = tokio::task::spawn_blocking(move || load_or_init(&load_path))
            .await
            .map_err(|e| StorageError::TaskFailed(e.to_string()))??;

        info!(path = %path.display(), records = records.len(), "Durable store loaded");

        Ok(Self {
            inner: Arc::new(Inner {
                path,
                records: RwLock::new(records),
                writer: Mutex::new(()),
            }),
        })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Returns a copy of the record stored under `id`.
    pub fn get(&self, id: &str) -> Option<ShaderRecord> {
        self.inner.records.read().get(id).cloned()
    }

    /// Returns `true` if `id` is stored.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.records.read().contains_key(id)
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.inner.records.read().len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.inner.records.read().is_empty()
    }

    /// Stores `record` under `id` and rewrites the file.
    ///
    /// The write runs on its own task, so dropping the returned future (e.g. on a request
    /// timeout) does not abandon it halfway: it still completes or fails as a whole, and
    /// the next writer waits for it. On failure the in-memory map is left untouched.
    #[instrument(skip(self, record), fields(id = %id, path = %self.inner.path.display()))]
    pub async fn insert(&self, id: &str, record: ShaderRecord) -> StorageResult<()> {
        let inner = Arc::clone(&self.inner);
        let id = id.to_string();

        tokio::spawn(async move { inner.commit(id, record).await }.in_current_span())
            .await
            .map_err(|e| StorageError::TaskFailed(e.to_string()))?
    }
}

impl Inner {
    /// Persists the map with `record` added, then publishes it in memory.
    async fn commit(&self, id: String, record: ShaderRecord) -> StorageResult<()> {
        let _writer = self.writer.lock().await;

        let snapshot = {
            let mut next = self.records.read().clone();
            next.insert(id.clone(), record.clone());
            serde_json::to_vec(&next)
        };

        let result = match snapshot {
            Ok(bytes) => self.persist(bytes).await,
            Err(e) => Err(StorageError::Serialization(e)),
        };

        if let Err(e) = result {
            error!(error = %e, "Failed to persist durable store, insert discarded");
            return Err(e);
        }

        self.records.write().insert(id, record);
        debug!("Durable store persisted");
        Ok(())
    }

    async fn persist(&self, bytes: Vec<u8>) -> StorageResult<()> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes))
            .await
            .map_err(|e| StorageError::TaskFailed(e.to_string()))?
    }
}

impl std::fmt::Debug for DurableStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurableStore")
            .field("path", &self.inner.path)
            .field("records", &self.len())
            .finish()
    }
}

fn load_or_init(path: &Path) -> StorageResult<HashMap<String, ShaderRecord>> {
    match fs::read(path) {
        Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => {
            write_atomic(path, EMPTY_STORE)?;
            Ok(HashMap::new())
        }
        Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            write_atomic(path, EMPTY_STORE)?;
            Ok(HashMap::new())
        }
        Err(e) => Err(e.into()),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

fn write_atomic(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let temp = temp_path(path);
    let result = write_and_rename(&temp, path, bytes);
    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}

fn write_and_rename(temp: &Path, path: &Path, bytes: &[u8]) -> StorageResult<()> {
    {
        let mut file = File::create(temp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    fs::rename(temp, path)?;
    Ok(())
}
