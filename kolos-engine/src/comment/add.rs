//! AddComment command

use crate::context::KolosContext;
use crate::error::{non_empty, KolosError, Result};
use crate::processor::ids_at;
use crate::types::{Comment, Task, TaskId, UserId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Comment on a task
#[operation(verb = "add", noun = "comment", description = "Add a comment to a task")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddComment {
    pub task: TaskId,
    /// Stored user id or external identity token
    pub author: UserId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<String>,
}

impl AddComment {
    pub fn new(
        task: impl Into<TaskId>,
        author: impl Into<UserId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            task: task.into(),
            author: author.into(),
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachments<I, S>(mut self, attachments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attachments = attachments.into_iter().map(Into::into).collect();
        self
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let content = non_empty("content", &self.content)?;

        let mut tx = ctx.begin();
        let mut task: Task = tx.load(&self.task).await?;
        let author = ctx.resolve_user(&tx, &self.author).await?;

        let comment = Comment::new(content, author, task.id.clone())
            .with_attachments(self.attachments.clone());
        task.comments.insert(0, comment.id.clone());
        task.touch();

        let value = serde_json::to_value(&comment)?;
        tx.save(comment);
        tx.save(task);
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for AddComment {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        let mut ids = ids_at(result, &["/id"]);
        ids.push(self.task.to_string());
        ids
    }
}
