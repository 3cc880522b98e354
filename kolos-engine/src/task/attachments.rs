//! Attachment list commands
//!
//! Attachments are opaque URIs owned by the storage service; the engine only
//! tracks list membership.

use super::task_json;
use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::types::{Task, TaskId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

fn clean_uris(uris: &[String]) -> Result<Vec<String>> {
    uris.iter()
        .map(|uri| {
            let uri = uri.trim();
            if uri.is_empty() {
                Err(KolosError::invalid_value("attachments", "URI must not be empty"))
            } else {
                Ok(uri.to_string())
            }
        })
        .collect()
}

/// Append attachments to a task, skipping ones already attached
#[operation(verb = "attach", noun = "task", description = "Add attachment URIs to a task")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAttachments {
    pub id: TaskId,
    pub uris: Vec<String>,
}

impl AddAttachments {
    pub fn new<I, S>(id: impl Into<TaskId>, uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            uris: uris.into_iter().map(Into::into).collect(),
        }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let uris = clean_uris(&self.uris)?;

        let mut tx = ctx.begin();
        let mut task: Task = tx.load(&self.id).await?;
        let before = task.attachments.len();
        for uri in uris {
            if !task.attachments.contains(&uri) {
                task.attachments.push(uri);
            }
        }
        if task.attachments.len() != before {
            task.touch();
            tx.save(task.clone());
        }

        let value = task_json(&tx, &task).await?;
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for AddAttachments {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}

/// Remove attachments from a task. Every URI must currently be attached.
#[operation(verb = "detach", noun = "task", description = "Remove attachment URIs from a task")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveAttachments {
    pub id: TaskId,
    pub uris: Vec<String>,
}

impl RemoveAttachments {
    pub fn new<I, S>(id: impl Into<TaskId>, uris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            uris: uris.into_iter().map(Into::into).collect(),
        }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let uris = clean_uris(&self.uris)?;

        let mut tx = ctx.begin();
        let mut task: Task = tx.load(&self.id).await?;
        if let Some(missing) = uris.iter().find(|uri| !task.attachments.contains(uri)) {
            return Err(KolosError::not_found("attachment", missing));
        }

        task.attachments.retain(|uri| !uris.contains(uri));
        task.touch();
        tx.save(task.clone());

        let value = task_json(&tx, &task).await?;
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for RemoveAttachments {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{fixtures::seeded, AddTask};

    #[tokio::test]
    async fn test_add_and_remove_attachments() {
        let s = seeded().await;
        let task = AddTask::new(s.board.clone(), s.todo(), "ada", "Task")
            .execute(&s.ctx)
            .await
            .into_result()
            .unwrap();
        let id = task["id"].as_str().unwrap();

        let value = AddAttachments::new(id, ["s3://a.png", "s3://b.png", "s3://a.png"])
            .execute(&s.ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(
            value["attachments"],
            serde_json::json!(["s3://a.png", "s3://b.png"])
        );

        let value = RemoveAttachments::new(id, ["s3://a.png"])
            .execute(&s.ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["attachments"], serde_json::json!(["s3://b.png"]));
    }

    #[tokio::test]
    async fn test_remove_unknown_attachment() {
        let s = seeded().await;
        let task = AddTask::new(s.board.clone(), s.todo(), "ada", "Task")
            .execute(&s.ctx)
            .await
            .into_result()
            .unwrap();
        let id = task["id"].as_str().unwrap();

        let result = RemoveAttachments::new(id, ["s3://never.png"])
            .execute(&s.ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KolosError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_attach_to_missing_task() {
        let s = seeded().await;
        let result = AddAttachments::new("nope", ["s3://a.png"])
            .execute(&s.ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KolosError::NotFound { .. })));
    }
}
