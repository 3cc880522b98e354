//! SetLocation command

use super::{board_of, task_json};
use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::types::{Board, Column, Location, Task, TaskId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Send a task to its board's backlog or bring it back.
///
/// `Backlog` moves the task into the board's Backlog column. `Board` moves a
/// task out of the Backlog column into the first other column in board
/// order; a task already outside the backlog stays where it is.
#[operation(verb = "locate", noun = "task", description = "Move a task between the backlog and the board")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetLocation {
    pub id: TaskId,
    pub location: Location,
}

impl SetLocation {
    pub fn new(id: impl Into<TaskId>, location: Location) -> Self {
        Self {
            id: id.into(),
            location,
        }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let mut tx = ctx.begin();
        let mut task: Task = tx.load(&self.id).await?;
        let board: Board = tx.load(board_of(&task)?).await?;

        let mut columns = Vec::with_capacity(board.columns.len());
        for id in &board.columns {
            if let Some(column) = tx.find::<Column>(id).await? {
                columns.push(column);
            }
        }
        let current_is_backlog = columns
            .iter()
            .any(|c| c.id == task.column && c.is_backlog());

        let target = match self.location {
            Location::Backlog => columns.iter().find(|c| c.is_backlog()),
            Location::Board if current_is_backlog => columns.iter().find(|c| !c.is_backlog()),
            Location::Board => columns.iter().find(|c| c.id == task.column),
        }
        .ok_or_else(|| {
            KolosError::not_found(
                "column",
                format!("{:?} column on board {}", self.location, board.id),
            )
        })?;

        if task.column != target.id || task.location != self.location {
            task.column = target.id.clone();
            task.location = self.location;
            task.touch();
            tx.save(task.clone());
        }

        let value = task_json(&tx, &task).await?;
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for SetLocation {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}
