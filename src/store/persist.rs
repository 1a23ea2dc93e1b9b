//! Persistence of dashboard state as per-user JSON blobs.
//!
//! State is written as a versioned envelope under the key
//! `dashboard-storage:<user id>`. The [`BlobStore`] trait abstracts the
//! key-value backend:
//!
//! - [`JsonFileBlobStore`]: one JSON file per key, written atomically
//!   (temp file, fsync, rename).
//! - [`MemoryBlobStore`]: in-process map, used by tests and headless runs.
//! - [`BackgroundWriter`]: wraps another store and performs writes on a tokio
//!   task so callers never wait on disk.

use super::error::StorageError;
use super::record::WidgetRecord;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

/// Prefix of the per-user dashboard storage key.
pub const STORAGE_KEY_PREFIX: &str = "dashboard-storage:";

/// Distinguishes temp files written within the same millisecond.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// Current version of the persisted envelope.
pub const SCHEMA_VERSION: u32 = 1;

/// Returns the blob key holding the dashboard of `user_id`.
pub fn storage_key(user_id: &str) -> String {
    format!("{STORAGE_KEY_PREFIX}{user_id}")
}

/// Key-value blob backend.
///
/// Implementations must be usable from multiple threads because the
/// [`BackgroundWriter`] performs writes off the UI task.
pub trait BlobStore: Send + Sync {
    /// Reads the blob stored under `key`, or `None` if there is none.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous blob.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Deletes the blob under `key`. Deleting a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Versioned on-disk form of a dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedDashboard {
    /// Envelope schema version.
    #[serde(default)]
    pub version: u32,
    /// Widget records in insertion order.
    pub widgets: Vec<WidgetRecord>,
    /// Last sequence number handed out for widget ids.
    #[serde(default)]
    pub next_seq: u64,
}

#[derive(Deserialize)]
struct VersionHeader {
    #[serde(default)]
    version: u32,
}

impl PersistedDashboard {
    /// Wraps the given state in a current-version envelope.
    pub fn new(widgets: Vec<WidgetRecord>, next_seq: u64) -> Self {
        Self {
            version: SCHEMA_VERSION,
            widgets,
            next_seq,
        }
    }

    /// Serializes the envelope to JSON.
    pub fn encode(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(StorageError::Encode)
    }

    /// Parses an envelope, rejecting versions newer than this build knows.
    pub fn decode(blob: &str) -> Result<Self, StorageError> {
        let header: VersionHeader =
            serde_json::from_str(blob).map_err(|e| StorageError::Decode(e.to_string()))?;
        if header.version > SCHEMA_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: header.version,
                supported: SCHEMA_VERSION,
            });
        }
        serde_json::from_str(blob).map_err(|e| StorageError::Decode(e.to_string()))
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Writes the pending value of `key`, if any, and clears it unless a newer
/// value arrived meanwhile. Caller holds the writer's `write_lock`.
fn write_latest(
    inner: &dyn BlobStore,
    pending: &Mutex<HashMap<String, String>>,
    key: &str,
) -> Option<Result<(), StorageError>> {
    let value = lock(pending).get(key).cloned()?;
    let result = inner.write(key, &value);
    let mut pending = lock(pending);
    if pending.get(key) == Some(&value) {
        pending.remove(key);
    }
    Some(result)
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Blob store backed by an in-process map.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        lock(&self.blobs).len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        lock(&self.blobs).is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.blobs).get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.blobs).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        lock(&self.blobs).remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// Blob store keeping one JSON file per key in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileBlobStore {
    dir: PathBuf,
}

impl JsonFileBlobStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the blob files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path used for `key`.
    ///
    /// Characters other than ASCII alphanumerics, `-` and `_` are replaced by
    /// `_` so keys like `dashboard-storage:user1` map to portable file names.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl BlobStore for JsonFileBlobStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io { path, source: e }),
        }
    }

    /// Writes atomically: temp file with a unique suffix, fsync, rename.
    ///
    /// On failure before the rename the temp file is left behind as a
    /// safety copy.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::Io {
            path: self.dir.clone(),
            source: e,
        })?;

        let path = self.path_for(key);
        let timestamp = Local::now().format("%Y%m%d-%H%M%S%.3f").to_string();
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let temp_path = path.with_file_name(format!(
            "{file_name}.tmp.{timestamp}.{}.{seq}",
            std::process::id()
        ));

        let io_err = |source| StorageError::Io {
            path: temp_path.clone(),
            source,
        };
        fs::write(&temp_path, value).map_err(io_err)?;
        fs::File::open(&temp_path)
            .and_then(|file| file.sync_all())
            .map_err(io_err)?;

        fs::rename(&temp_path, &path).map_err(|_| StorageError::WriteAtomic {
            path: path.clone(),
            temp_path: temp_path.clone(),
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io { path, source: e }),
        }
    }
}

// ---------------------------------------------------------------------------
// Background writer
// ---------------------------------------------------------------------------

/// Fire-and-forget write-behind wrapper around another blob store.
///
/// `write` records the value as pending and wakes a tokio task that writes
/// the latest pending value per key. Bursts of writes to one key coalesce.
/// Reads see pending values before they reach the inner store. Write
/// failures are logged and otherwise ignored.
///
/// Every write to the inner store happens under `write_lock`, and the value
/// is taken from `pending` only once the lock is held, so an older value can
/// never land after a newer one.
pub struct BackgroundWriter {
    inner: Arc<dyn BlobStore>,
    pending: Arc<Mutex<HashMap<String, String>>>,
    write_lock: Arc<Mutex<()>>,
    tx: mpsc::UnboundedSender<String>,
}

impl std::fmt::Debug for BackgroundWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundWriter")
            .field("pending", &lock(&self.pending).len())
            .finish()
    }
}

impl BackgroundWriter {
    /// Spawns the writer task on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn(inner: Arc<dyn BlobStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let pending: Arc<Mutex<HashMap<String, String>>> = Arc::default();
        let write_lock: Arc<Mutex<()>> = Arc::default();

        let task_inner = Arc::clone(&inner);
        let task_pending = Arc::clone(&pending);
        let task_lock = Arc::clone(&write_lock);
        tokio::spawn(async move {
            while let Some(key) = rx.recv().await {
                let inner = Arc::clone(&task_inner);
                let pending = Arc::clone(&task_pending);
                let write_lock = Arc::clone(&task_lock);
                let k = key.clone();
                let written = tokio::task::spawn_blocking(move || {
                    let _guard = lock(&write_lock);
                    write_latest(inner.as_ref(), &pending, &k)
                })
                .await;
                match written {
                    Ok(Some(Ok(()))) => tracing::trace!("persisted {}", key),
                    // Already written by an earlier wake-up or a flush.
                    Ok(None) => {}
                    Ok(Some(Err(e))) => tracing::warn!("failed to persist {}: {}", key, e),
                    Err(e) => tracing::warn!("persist task for {} failed: {}", key, e),
                }
            }
            tracing::debug!("background writer stopped");
        });

        Self {
            inner,
            pending,
            write_lock,
            tx,
        }
    }

    /// Number of writes not yet handed to the inner store.
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Synchronously writes every pending value to the inner store.
    ///
    /// Called before shutdown so the last state is not lost with the runtime.
    /// Waits for a write already in progress on the task before draining.
    pub fn flush(&self) {
        let _guard = lock(&self.write_lock);
        let drained: Vec<(String, String)> = lock(&self.pending).drain().collect();
        for (key, value) in drained {
            if let Err(e) = self.inner.write(&key, &value) {
                tracing::warn!("failed to persist {} during flush: {}", key, e);
            }
        }
    }
}

impl BlobStore for BackgroundWriter {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if let Some(value) = lock(&self.pending).get(key) {
            return Ok(Some(value.clone()));
        }
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        lock(&self.pending).insert(key.to_string(), value.to_string());
        if self.tx.send(key.to_string()).is_err() {
            // Writer task is gone; fall back to a direct write.
            let _guard = lock(&self.write_lock);
            lock(&self.pending).remove(key);
            return self.inner.write(key, value);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = lock(&self.write_lock);
        lock(&self.pending).remove(key);
        self.inner.remove(key)
    }
}
