//! CreateSubtask command

use super::task_json;
use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::processor::ids_at;
use crate::types::{Board, Task, TaskId, TaskType, Team, UserId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Create a subtask under a top-level task.
///
/// Nesting is one level deep: a subtask cannot be a parent. The new task
/// takes its parent's column, board and team and is registered in the
/// board's task list and the team's index like any other task.
#[operation(verb = "add", noun = "subtask", description = "Create a subtask under a task")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubtask {
    pub parent: TaskId,
    pub author: UserId,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
}

impl CreateSubtask {
    pub fn new(
        parent: impl Into<TaskId>,
        author: impl Into<UserId>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            parent: parent.into(),
            author: author.into(),
            description: description.into(),
            task_type: TaskType::default(),
        }
    }

    pub fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let mut tx = ctx.begin();
        let mut parent: Task = tx.load(&self.parent).await?;
        let author = ctx.resolve_user(&tx, &self.author).await?;

        let sub = Task::subtask_of(&parent, self.description.trim(), author)
            .with_type(self.task_type);
        let Some(sub_tasks) = parent.sub_tasks_mut() else {
            return Err(KolosError::invalid_hierarchy(format!(
                "task {} is already a subtask and cannot have subtasks",
                self.parent
            )));
        };
        sub_tasks.push(sub.id.clone());
        parent.touch();

        if let Some(board_id) = &parent.board {
            let mut board: Board = tx.load(board_id).await?;
            board.push_task(sub.id.clone());
            tx.save(board);
        }
        let mut team: Team = tx.load(&parent.team).await?;
        team.index_task(sub.id.clone());

        tx.save(team);
        tx.save(parent);
        tx.save(sub.clone());
        let value = task_json(&tx, &sub).await?;
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for CreateSubtask {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        let mut ids = ids_at(result, &["/id"]);
        ids.push(self.parent.to_string());
        ids
    }
}
