//! Comment: a message on exactly one task

use super::ids::{CommentId, TaskId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment owned by a task; deleted with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub author: UserId,
    pub task: TaskId,
    #[serde(default)]
    pub attachments: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new comment
    pub fn new(content: impl Into<String>, author: UserId, task: TaskId) -> Self {
        Self {
            id: CommentId::new(),
            content: content.into(),
            author,
            task,
            attachments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Attach opaque URIs
    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = attachments;
        self
    }
}
