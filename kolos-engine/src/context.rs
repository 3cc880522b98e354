//! KolosContext - access to the engine's collaborators
//!
//! The context hands commands their store, identity lookup, event sink and
//! configuration. No business logic lives here; commands do the work.

use crate::config::KolosConfig;
use crate::error::{KolosError, Result};
use crate::identity::{IdentityLookup, NoExternalIdentity};
use crate::notify::{EventSink, NullSink};
use crate::store::{MemoryStore, Store, Transaction};
use crate::types::{User, UserId};
use std::sync::Arc;

/// Context passed to every command
#[derive(Clone)]
pub struct KolosContext {
    store: Arc<dyn Store>,
    identity: Arc<dyn IdentityLookup>,
    events: Arc<dyn EventSink>,
    config: KolosConfig,
}

impl KolosContext {
    /// Create a context over a store with no external identities, no event
    /// subscriber and default configuration
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            identity: Arc::new(NoExternalIdentity),
            events: Arc::new(NullSink),
            config: KolosConfig::default(),
        }
    }

    /// Create a context over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Open the store named by `config`
    pub async fn open(config: KolosConfig) -> Result<Self> {
        let store = config.open_store().await?;
        Ok(Self::new(store).with_config(config))
    }

    pub fn with_identity(mut self, identity: Arc<dyn IdentityLookup>) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_config(mut self, config: KolosConfig) -> Self {
        self.config = config;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn identity(&self) -> &dyn IdentityLookup {
        self.identity.as_ref()
    }

    pub fn events(&self) -> &dyn EventSink {
        self.events.as_ref()
    }

    pub fn config(&self) -> &KolosConfig {
        &self.config
    }

    /// Start a unit of work against the store
    pub fn begin(&self) -> Transaction<'_> {
        Transaction::new(self.store.as_ref())
    }

    /// Resolve a user reference.
    ///
    /// A stored user id wins; anything else goes through the identity lookup,
    /// and the id it returns must name a stored user too.
    pub async fn resolve_user(&self, tx: &Transaction<'_>, reference: &UserId) -> Result<UserId> {
        if tx.exists::<User>(reference).await? {
            return Ok(reference.clone());
        }

        let resolved = self.identity.resolve(reference.as_str()).await?;
        if tx.exists::<User>(&resolved).await? {
            Ok(resolved)
        } else {
            Err(KolosError::not_found("user", reference))
        }
    }
}
