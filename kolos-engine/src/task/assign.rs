//! AssignTask command

use super::task_json;
use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::types::{Task, TaskId, UserId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::time::Instant;

/// Replace a task's assignee set.
///
/// Every user must resolve (stored id or external token) or nothing is
/// written. Assigning the same set twice is a no-op.
#[operation(verb = "assign", noun = "task", description = "Replace the assignees of a task")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignTask {
    pub id: TaskId,
    pub users: Vec<UserId>,
}

impl AssignTask {
    pub fn new<I, U>(id: impl Into<TaskId>, users: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<UserId>,
    {
        Self {
            id: id.into(),
            users: users.into_iter().map(Into::into).collect(),
        }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let mut tx = ctx.begin();
        let mut task: Task = tx.load(&self.id).await?;

        let mut assignees = BTreeSet::new();
        for user in &self.users {
            assignees.insert(ctx.resolve_user(&tx, user).await?);
        }

        if task.assigned_to != assignees {
            task.assigned_to = assignees;
            task.touch();
            tx.save(task.clone());
        }

        let value = task_json(&tx, &task).await?;
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for AssignTask {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        let mut ids = vec![self.id.to_string()];
        ids.extend(self.users.iter().map(|u| u.to_string()));
        ids
    }
}
