//! Identity lookup: external user tokens to engine user ids
//!
//! Authentication lives outside the engine. Commands accept either a stored
//! [`UserId`] or an external token; [`KolosContext::resolve_user`] tries the
//! users table first and falls back to the configured [`IdentityLookup`].
//!
//! [`KolosContext::resolve_user`]: crate::KolosContext::resolve_user

use crate::error::{KolosError, Result};
use crate::types::UserId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

/// Resolve an external identity token to a user id
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// "No such user" is a hard `NotFound`, never retried
    async fn resolve(&self, token: &str) -> Result<UserId>;
}

/// Lookup that knows no external tokens
#[derive(Debug, Default)]
pub struct NoExternalIdentity;

#[async_trait]
impl IdentityLookup for NoExternalIdentity {
    async fn resolve(&self, token: &str) -> Result<UserId> {
        Err(KolosError::not_found("user", token))
    }
}

/// In-process token directory
#[derive(Debug, Default)]
pub struct DirectoryIdentity {
    entries: RwLock<HashMap<String, UserId>>,
}

impl DirectoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a token to a user, replacing any previous mapping
    pub fn register(&self, token: impl Into<String>, user: UserId) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(token.into(), user);
        }
    }

    /// Forget a token
    pub fn revoke(&self, token: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(token);
        }
    }
}

#[async_trait]
impl IdentityLookup for DirectoryIdentity {
    async fn resolve(&self, token: &str) -> Result<UserId> {
        let entries = self
            .entries
            .read()
            .map_err(|_| KolosError::unavailable("identity directory poisoned"))?;
        entries
            .get(token)
            .cloned()
            .ok_or_else(|| KolosError::not_found("user", token))
    }
}
