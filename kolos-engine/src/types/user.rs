//! User records resolved from the identity layer

use super::ids::UserId;
use serde::{Deserialize, Serialize};

/// A person who can author, be assigned, and belong to teams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    /// Create a user with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: None,
        }
    }

    /// Set the email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Use a caller-chosen id
    pub fn with_id(mut self, id: impl Into<UserId>) -> Self {
        self.id = id.into();
        self
    }
}
