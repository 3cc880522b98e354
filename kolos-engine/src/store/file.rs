//! File-backed store: one JSON file per record
//!
//! ```text
//! .kolos/
//! ├── teams/{id}.json
//! ├── boards/{id}.json
//! ├── columns/{id}.json
//! ├── tasks/{id}.json
//! ├── comments/{id}.json
//! ├── users/{id}.json
//! ├── links/{from}.{to}.json
//! ├── journal.json        # present only while a commit is being applied
//! └── .lock
//! ```
//!
//! A commit writes the whole batch to `journal.json` first, together with
//! the records it replaces, then applies it record by record, then removes
//! the journal. If applying fails part way the replaced records are put
//! back before the error is returned. A journal left behind by a crash is
//! settled before the store is used again: on open, and at the start of
//! every commit. Settling replays the batch, or restores the replaced
//! records when the batch cannot be replayed, so half a batch is never
//! visible.

use super::{EntityKey, EntityKind, Record, Store, Write};
use crate::error::{KolosError, Result};
use async_trait::async_trait;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;
use tracing::{debug, warn};

/// How long a commit waits for another process to release the lock
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);
const LOCK_RETRY: Duration = Duration::from_millis(10);

/// Contents of `journal.json` while a commit is in flight
#[derive(Debug, Serialize, Deserialize)]
struct Journal {
    writes: Vec<Write>,
    /// What each key held before the batch, in batch order
    undo: Vec<Write>,
}

/// Store rooted at a directory
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`, replaying any
    /// interrupted commit
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { root: root.into() };
        store.create_directories().await?;
        store.recover().await?;
        Ok(store)
    }

    // =========================================================================
    // Path helpers
    // =========================================================================

    /// Get the root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one kind of record
    pub fn kind_dir(&self, kind: EntityKind) -> PathBuf {
        let name = match kind {
            EntityKind::Team => "teams",
            EntityKind::Board => "boards",
            EntityKind::Column => "columns",
            EntityKind::Task => "tasks",
            EntityKind::Comment => "comments",
            EntityKind::User => "users",
            EntityKind::Link => "links",
        };
        self.root.join(name)
    }

    /// Path of the record file for a key
    pub fn record_path(&self, key: &EntityKey) -> Result<PathBuf> {
        let stem = match key {
            EntityKey::Team(id) => file_stem(id.as_str())?,
            EntityKey::Board(id) => file_stem(id.as_str())?,
            EntityKey::Column(id) => file_stem(id.as_str())?,
            EntityKey::Task(id) => file_stem(id.as_str())?,
            EntityKey::Comment(id) => file_stem(id.as_str())?,
            EntityKey::User(id) => file_stem(id.as_str())?,
            EntityKey::Link(edge) => format!(
                "{}.{}",
                file_stem(edge.from.as_str())?,
                file_stem(edge.to.as_str())?
            ),
        };
        Ok(self.kind_dir(key.kind()).join(format!("{stem}.json")))
    }

    /// Path to the commit journal
    pub fn journal_path(&self) -> PathBuf {
        self.root.join("journal.json")
    }

    /// Path to the lock file
    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    // =========================================================================
    // Directory initialization
    // =========================================================================

    /// Create the directory structure. Idempotent.
    pub async fn create_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        for kind in EntityKind::ALL {
            fs::create_dir_all(self.kind_dir(kind)).await?;
        }
        Ok(())
    }

    // =========================================================================
    // Commit protocol
    // =========================================================================

    /// Take the exclusive lock, retrying until `LOCK_TIMEOUT`
    async fn lock(&self) -> Result<StoreLock> {
        let lock_path = self.lock_path();
        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)?;

        let start = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(StoreLock { file }),
                Err(_) if start.elapsed() < LOCK_TIMEOUT => {
                    tokio::time::sleep(LOCK_RETRY).await;
                }
                Err(_) => {
                    return Err(KolosError::unavailable(format!(
                        "lock timeout after {}ms",
                        start.elapsed().as_millis()
                    )))
                }
            }
        }
    }

    async fn apply(&self, writes: &[Write]) -> Result<()> {
        for write in writes {
            let path = self.record_path(&write.key)?;
            match &write.record {
                Some(record) => {
                    let content = serde_json::to_string_pretty(record)?;
                    atomic_write(&path, content.as_bytes()).await?;
                }
                None => {
                    if path.exists() {
                        fs::remove_file(&path).await?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Put back the records a batch replaced. Keeps going past failures and
    /// reports whether every key was restored.
    async fn restore(&self, undo: &[Write]) -> bool {
        let mut restored = true;
        // Reverse order, so a key written twice ends at its oldest image
        for write in undo.iter().rev() {
            if let Err(e) = self.apply(std::slice::from_ref(write)).await {
                warn!(key = ?write.key, error = %e, "failed to restore record");
                restored = false;
            }
        }
        restored
    }

    /// Settle a journal left by an interrupted commit. The caller holds the
    /// lock.
    async fn settle_journal(&self) -> Result<()> {
        let path = self.journal_path();
        if !path.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(&path).await?;
        match serde_json::from_str::<Journal>(&content) {
            Ok(journal) => {
                warn!(writes = journal.writes.len(), "replaying interrupted commit");
                if let Err(e) = self.apply(&journal.writes).await {
                    warn!(error = %e, "interrupted commit cannot be replayed, rolling back");
                    if !self.restore(&journal.undo).await {
                        return Err(KolosError::unavailable(format!(
                            "interrupted commit in {} can be neither replayed nor rolled back",
                            path.display()
                        )));
                    }
                }
            }
            Err(e) => {
                // The journal is written atomically, so this is outside damage.
                warn!(error = %e, "discarding unreadable journal");
            }
        }
        fs::remove_file(&path).await?;
        Ok(())
    }

    /// Settle a leftover journal before first use
    async fn recover(&self) -> Result<()> {
        if !self.journal_path().exists() {
            return Ok(());
        }
        let _lock = self.lock().await?;
        self.settle_journal().await
    }

    async fn read_record(path: &Path) -> Result<Option<Record>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).await?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

#[async_trait]
impl Store for FileStore {
    async fn get(&self, key: &EntityKey) -> Result<Option<Record>> {
        Self::read_record(&self.record_path(key)?).await
    }

    async fn scan(&self, kind: EntityKind) -> Result<Vec<Record>> {
        let dir = self.kind_dir(kind);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                if let Some(record) = Self::read_record(&path).await? {
                    records.push(record);
                }
            }
        }

        records.sort_by_key(Record::key);
        Ok(records)
    }

    async fn commit(&self, writes: Vec<Write>) -> Result<()> {
        // Reject bad keys before the journal exists
        for write in &writes {
            self.record_path(&write.key)?;
        }

        let _lock = self.lock().await?;
        self.settle_journal().await?;

        let mut undo = Vec::with_capacity(writes.len());
        for write in &writes {
            undo.push(Write {
                key: write.key.clone(),
                record: Self::read_record(&self.record_path(&write.key)?).await?,
            });
        }
        let journal = Journal { writes, undo };
        let path = self.journal_path();
        atomic_write(&path, serde_json::to_string(&journal)?.as_bytes()).await?;

        if let Err(e) = self.apply(&journal.writes).await {
            if self.restore(&journal.undo).await {
                fs::remove_file(&path).await?;
            } else {
                // The journal stays so the next commit or open settles it
                warn!(journal = %path.display(), "commit rollback incomplete");
            }
            warn!(error = %e, writes = journal.writes.len(), "commit rolled back");
            return Err(e);
        }

        fs::remove_file(&path).await?;
        debug!(writes = journal.writes.len(), root = %self.root.display(), "commit applied");
        Ok(())
    }
}

/// RAII lock guard - releases on drop
struct StoreLock {
    file: std::fs::File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Ids become file names, so keep them to a safe alphabet
fn file_stem(id: &str) -> Result<String> {
    if id.is_empty()
        || !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(KolosError::invalid_value(
            "id",
            format!("'{id}' cannot be stored; use letters, digits, '-' or '_'"),
        ));
    }
    Ok(id.to_string())
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;

    // Rename (atomic on same filesystem)
    fs::rename(&temp_path, path).await?;

    Ok(())
}
