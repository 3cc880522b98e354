//! AddTask command

use super::{column_on_board, task_json};
use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::processor::ids_at;
use crate::types::{Board, BoardId, ColumnId, Task, TaskType, Team, UserId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Create a task in a column of a board.
///
/// The task is appended to the board's task list and the team's task index.
/// Placing it in the Backlog column makes it a backlog task.
#[operation(verb = "add", noun = "task", description = "Create a task in a board column")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTask {
    pub board: BoardId,
    pub column: ColumnId,
    /// Stored user id or external identity token
    pub author: UserId,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<UserId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl AddTask {
    pub fn new(
        board: impl Into<BoardId>,
        column: impl Into<ColumnId>,
        author: impl Into<UserId>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            board: board.into(),
            column: column.into(),
            author: author.into(),
            description: description.into(),
            task_type: TaskType::default(),
            assignees: Vec::new(),
            labels: Vec::new(),
        }
    }

    pub fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    pub fn with_assignees<I, U>(mut self, assignees: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<UserId>,
    {
        self.assignees = assignees.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let labels = super::labels::normalize(&self.labels)?;

        let mut tx = ctx.begin();
        let mut board: Board = tx.load(&self.board).await?;
        let column = column_on_board(&tx, &self.column, &board).await?;
        let mut team: Team = tx.load(&board.team).await?;
        let author = ctx.resolve_user(&tx, &self.author).await?;

        let mut task = Task::new(
            self.description.trim(),
            author,
            team.id.clone(),
            board.id.clone(),
            column.id.clone(),
        )
        .with_type(self.task_type);
        task.location = column.location();
        task.labels = labels;
        for assignee in &self.assignees {
            task.assigned_to.insert(ctx.resolve_user(&tx, assignee).await?);
        }

        board.push_task(task.id.clone());
        team.index_task(task.id.clone());

        tx.save(task.clone());
        tx.save(board);
        tx.save(team);
        let value = task_json(&tx, &task).await?;
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for AddTask {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        let mut ids = ids_at(result, &["/id"]);
        ids.push(self.board.to_string());
        ids
    }
}
