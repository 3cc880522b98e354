//! GetTask command

use super::task_json;
use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::types::{Task, TaskId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Get a task with `linked_tasks` and `tasks_linked_to_this`
#[operation(verb = "get", noun = "task", description = "Get a task by ID")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTask {
    pub id: TaskId,
}

impl GetTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self { id: id.into() }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let tx = ctx.begin();
        let task: Task = tx.load(&self.id).await?;
        task_json(&tx, &task).await
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for GetTask {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        ExecutionResult::read(self.run(ctx).await)
    }
}
