//! In-memory store

use super::{EntityKey, EntityKind, Record, Store, Write};
use crate::error::{KolosError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Store backed by an ordered map.
///
/// Commits take the write lock once and apply every write under it, which
/// makes them atomic. Two switches simulate an unreachable backend:
/// [`fail_next_commit`](MemoryStore::fail_next_commit) rejects exactly one
/// commit and [`set_offline`](MemoryStore::set_offline) fails every call.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<BTreeMap<EntityKey, Record>>,
    fail_next_commit: AtomicBool,
    offline: AtomicBool,
    commits: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next commit with `Unavailable`, applying nothing
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Make every call fail with `Unavailable` until switched back
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of commits applied so far
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Number of records currently stored
    pub async fn len(&self) -> usize {
        self.tables.read().await.len()
    }

    /// Check if the store holds no records
    pub async fn is_empty(&self) -> bool {
        self.tables.read().await.is_empty()
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(KolosError::unavailable("store offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &EntityKey) -> Result<Option<Record>> {
        self.check_online()?;
        Ok(self.tables.read().await.get(key).cloned())
    }

    async fn scan(&self, kind: EntityKind) -> Result<Vec<Record>> {
        self.check_online()?;
        Ok(self
            .tables
            .read()
            .await
            .iter()
            .filter(|(key, _)| key.kind() == kind)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn commit(&self, writes: Vec<Write>) -> Result<()> {
        self.check_online()?;
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(KolosError::unavailable("transaction aborted"));
        }

        let mut tables = self.tables.write().await;
        for write in writes {
            match write.record {
                Some(record) => {
                    tables.insert(write.key, record);
                }
                None => {
                    tables.remove(&write.key);
                }
            }
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Entity;
    use crate::types::User;

    fn put(user: User) -> Write {
        Write {
            key: user.key(),
            record: Some(user.into_record()),
        }
    }

    #[tokio::test]
    async fn test_commit_and_get() {
        let store = MemoryStore::new();
        let user = User::new("Ada");
        store.commit(vec![put(user.clone())]).await.unwrap();

        let loaded = store.get(&user.key()).await.unwrap();
        assert_eq!(loaded, Some(user.into_record()));
        assert_eq!(store.commit_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_commit_applies_nothing() {
        let store = MemoryStore::new();
        store.fail_next_commit();

        let result = store
            .commit(vec![put(User::new("Ada")), put(User::new("Bob"))])
            .await;
        assert!(matches!(result, Err(KolosError::Unavailable { .. })));
        assert!(store.is_empty().await);
        assert_eq!(store.commit_count(), 0);

        // Only one commit is rejected
        store.commit(vec![put(User::new("Ada"))]).await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_offline() {
        let store = MemoryStore::new();
        store.set_offline(true);
        assert!(store.scan(EntityKind::User).await.is_err());
        store.set_offline(false);
        assert!(store.scan(EntityKind::User).await.unwrap().is_empty());
    }
}
