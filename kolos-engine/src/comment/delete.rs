//! DeleteComment command

use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::types::{Comment, CommentId, Task};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Delete a comment and drop it from its task
#[operation(verb = "delete", noun = "comment", description = "Delete a comment")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteComment {
    pub id: CommentId,
}

impl DeleteComment {
    pub fn new(id: impl Into<CommentId>) -> Self {
        Self { id: id.into() }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let mut tx = ctx.begin();
        let comment: Comment = tx.load(&self.id).await?;

        if let Some(mut task) = tx.find::<Task>(&comment.task).await? {
            task.comments.retain(|id| id != &comment.id);
            task.touch();
            tx.save(task);
        }
        tx.remove::<Comment>(&comment.id);
        tx.commit().await?;

        Ok(serde_json::json!({ "deleted": true, "id": comment.id, "task": comment.task }))
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for DeleteComment {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        crate::processor::ids_at(result, &["/id", "/task"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::fixtures::seeded;

    #[tokio::test]
    async fn test_delete_comment() {
        let s = seeded().await;
        let task_id = s.board().await.tasks[0].clone();
        let task: Task = s.ctx.begin().load(&task_id).await.unwrap();
        let id = task.comments[0].clone();

        DeleteComment::new(id.clone())
            .execute(&s.ctx)
            .await
            .into_result()
            .unwrap();

        let tx = s.ctx.begin();
        assert!(!tx.exists::<Comment>(&id).await.unwrap());
        let task: Task = tx.load(&task_id).await.unwrap();
        assert!(task.comments.is_empty());
    }
}
