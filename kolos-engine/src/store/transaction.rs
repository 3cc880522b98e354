//! Staged multi-record transactions over a [`Store`]

use super::{Entity, EntityKey, EntityKind, Record, Store, Write};
use crate::error::{KolosError, Result};
use crate::types::{LinkEdge, TaskId};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// A unit of work.
///
/// Writes are staged in memory and only reach the store on [`commit`], as one
/// atomic batch. Reads see staged writes first, so a multi-step operation can
/// build on its own earlier steps. Dropping a transaction without committing
/// discards everything it staged.
///
/// [`commit`]: Transaction::commit
pub struct Transaction<'a> {
    store: &'a dyn Store,
    staged: BTreeMap<EntityKey, Option<Record>>,
}

impl<'a> Transaction<'a> {
    /// Start an empty transaction
    pub fn new(store: &'a dyn Store) -> Self {
        Self {
            store,
            staged: BTreeMap::new(),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    async fn get_record(&self, key: &EntityKey) -> Result<Option<Record>> {
        match self.staged.get(key) {
            Some(staged) => Ok(staged.clone()),
            None => self.store.get(key).await,
        }
    }

    /// Read an entity, `None` if absent
    pub async fn find<E: Entity>(&self, id: &E::Id) -> Result<Option<E>> {
        let record = self.get_record(&E::key_for(id)).await?;
        Ok(record.and_then(E::from_record))
    }

    /// Read an entity, `NotFound` if absent
    pub async fn load<E: Entity>(&self, id: &E::Id) -> Result<E> {
        self.find::<E>(id)
            .await?
            .ok_or_else(|| KolosError::not_found(E::KIND.as_str(), id))
    }

    /// Check whether an entity exists
    pub async fn exists<E: Entity>(&self, id: &E::Id) -> Result<bool> {
        Ok(self.get_record(&E::key_for(id)).await?.is_some())
    }

    /// Read every entity of a kind, staged writes applied
    pub async fn list<E: Entity>(&self) -> Result<Vec<E>> {
        let mut merged: BTreeMap<EntityKey, Record> = self
            .store
            .scan(E::KIND)
            .await?
            .into_iter()
            .map(|record| (record.key(), record))
            .collect();

        for (key, staged) in self.staged.iter().filter(|(k, _)| k.kind() == E::KIND) {
            match staged {
                Some(record) => {
                    merged.insert(key.clone(), record.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_values().filter_map(E::from_record).collect())
    }

    /// Tasks `id` links to (its `linked_tasks`)
    pub async fn links_from(&self, id: &TaskId) -> Result<Vec<TaskId>> {
        Ok(self
            .list::<LinkEdge>()
            .await?
            .into_iter()
            .filter(|edge| &edge.from == id)
            .map(|edge| edge.to)
            .collect())
    }

    /// Tasks that link to `id` (its `tasks_linked_to_this`)
    pub async fn links_to(&self, id: &TaskId) -> Result<Vec<TaskId>> {
        Ok(self
            .list::<LinkEdge>()
            .await?
            .into_iter()
            .filter(|edge| &edge.to == id)
            .map(|edge| edge.from)
            .collect())
    }

    /// Every edge with `id` at either end
    pub async fn edges_touching(&self, id: &TaskId) -> Result<Vec<LinkEdge>> {
        Ok(self
            .list::<LinkEdge>()
            .await?
            .into_iter()
            .filter(|edge| edge.touches(id))
            .collect())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Stage an insert or overwrite
    pub fn save<E: Entity>(&mut self, entity: E) {
        let key = entity.key();
        trace!(%key, "staging save");
        self.staged.insert(key, Some(entity.into_record()));
    }

    /// Stage a delete
    pub fn remove<E: Entity>(&mut self, id: &E::Id) {
        let key = E::key_for(id);
        trace!(%key, "staging delete");
        self.staged.insert(key, None);
    }

    /// Number of staged writes
    pub fn len(&self) -> usize {
        self.staged.len()
    }

    /// Check if nothing is staged
    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Which kinds of records this transaction touches
    pub fn touched_kinds(&self) -> Vec<EntityKind> {
        let mut kinds: Vec<EntityKind> = self.staged.keys().map(EntityKey::kind).collect();
        kinds.dedup();
        kinds
    }

    /// Apply every staged write in one atomic batch
    pub async fn commit(self) -> Result<()> {
        if self.staged.is_empty() {
            return Ok(());
        }

        let kinds = self.touched_kinds();
        let writes: Vec<Write> = self
            .staged
            .into_iter()
            .map(|(key, record)| Write { key, record })
            .collect();

        debug!(writes = writes.len(), ?kinds, "committing transaction");
        self.store.commit(writes).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{User, UserId};

    #[tokio::test]
    async fn test_reads_see_staged_writes() {
        let store = MemoryStore::new();
        let mut tx = Transaction::new(&store);

        let user = User::new("Ada").with_id("u1");
        tx.save(user.clone());

        let loaded: User = tx.load(&UserId::from_string("u1")).await.unwrap();
        assert_eq!(loaded, user);

        // Nothing reached the store yet
        assert!(store.get(&user.key()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_commit_applies_all() {
        let store = MemoryStore::new();
        let mut tx = Transaction::new(&store);
        tx.save(User::new("Ada").with_id("u1"));
        tx.save(User::new("Bob").with_id("u2"));
        tx.commit().await.unwrap();

        let tx = Transaction::new(&store);
        let users: Vec<User> = tx.list().await.unwrap();
        assert_eq!(users.len(), 2);
    }

    #[tokio::test]
    async fn test_staged_delete_hides_record() {
        let store = MemoryStore::new();
        let mut tx = Transaction::new(&store);
        tx.save(User::new("Ada").with_id("u1"));
        tx.commit().await.unwrap();

        let mut tx = Transaction::new(&store);
        tx.remove::<User>(&UserId::from_string("u1"));
        assert!(tx.list::<User>().await.unwrap().is_empty());
        assert!(matches!(
            tx.load::<User>(&UserId::from_string("u1")).await,
            Err(KolosError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_dropped_transaction_writes_nothing() {
        let store = MemoryStore::new();
        {
            let mut tx = Transaction::new(&store);
            tx.save(User::new("Ada").with_id("u1"));
        }
        let tx = Transaction::new(&store);
        assert!(!tx.exists::<User>(&UserId::from_string("u1")).await.unwrap());
        assert_eq!(store.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_link_views() {
        let store = MemoryStore::new();
        let a = TaskId::from_string("a");
        let b = TaskId::from_string("b");
        let mut tx = Transaction::new(&store);
        tx.save(LinkEdge::new(a.clone(), b.clone()));

        assert_eq!(tx.links_from(&a).await.unwrap(), vec![b.clone()]);
        assert_eq!(tx.links_to(&b).await.unwrap(), vec![a.clone()]);
        assert!(tx.links_to(&a).await.unwrap().is_empty());
        assert_eq!(tx.edges_touching(&b).await.unwrap().len(), 1);
    }
}
