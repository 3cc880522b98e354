//! UpdateComment command

use crate::context::KolosContext;
use crate::error::{non_empty, KolosError, Result};
use crate::types::{Comment, CommentId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Edit a comment's content or attachments
#[operation(verb = "update", noun = "comment", description = "Edit a comment")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateComment {
    pub id: CommentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<String>>,
}

impl UpdateComment {
    pub fn new(id: impl Into<CommentId>) -> Self {
        Self {
            id: id.into(),
            content: None,
            attachments: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_attachments(mut self, attachments: Vec<String>) -> Self {
        self.attachments = Some(attachments);
        self
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let content = self
            .content
            .as_deref()
            .map(|c| non_empty("content", c))
            .transpose()?;

        let mut tx = ctx.begin();
        let mut comment: Comment = tx.load(&self.id).await?;
        if let Some(content) = content {
            comment.content = content;
        }
        if let Some(attachments) = &self.attachments {
            comment.attachments = attachments.clone();
        }

        let value = serde_json::to_value(&comment)?;
        tx.save(comment);
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for UpdateComment {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}
