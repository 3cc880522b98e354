//! Column and board moves

use super::{board_of, column_on_board, task_json};
use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::types::{Board, BoardId, ColumnId, Task, TaskId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Move a task to another column of its board.
///
/// Only the column reference changes; the board's canonical task order is
/// rewritten separately with `ReorderBoardTasks`. Subtasks keep their own
/// column; use `MoveToBoard` to carry them to another board.
#[operation(verb = "move", noun = "task", description = "Move a task to another column on its board")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveTask {
    pub id: TaskId,
    pub column: ColumnId,
}

impl MoveTask {
    pub fn new(id: impl Into<TaskId>, column: impl Into<ColumnId>) -> Self {
        Self {
            id: id.into(),
            column: column.into(),
        }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let mut tx = ctx.begin();
        let mut task: Task = tx.load(&self.id).await?;
        let board: Board = tx.load(board_of(&task)?).await?;
        let column = column_on_board(&tx, &self.column, &board).await?;

        if task.column != column.id {
            task.column = column.id.clone();
            task.location = column.location();
            task.touch();
            tx.save(task.clone());
        }

        let value = task_json(&tx, &task).await?;
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for MoveTask {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string(), self.column.to_string()]
    }
}

/// Move a top-level task, with its subtasks, to another board of the same team
#[operation(verb = "transfer", noun = "task", description = "Move a task and its subtasks to another board")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveToBoard {
    pub id: TaskId,
    pub board: BoardId,
    pub column: ColumnId,
}

impl MoveToBoard {
    pub fn new(
        id: impl Into<TaskId>,
        board: impl Into<BoardId>,
        column: impl Into<ColumnId>,
    ) -> Self {
        Self {
            id: id.into(),
            board: board.into(),
            column: column.into(),
        }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let mut tx = ctx.begin();
        let mut task: Task = tx.load(&self.id).await?;
        if let Some(parent) = task.parent_id() {
            return Err(KolosError::invalid_hierarchy(format!(
                "subtask {} moves with its parent {parent}",
                task.id
            )));
        }

        let mut target: Board = tx.load(&self.board).await?;
        if target.team != task.team {
            return Err(KolosError::invalid_value(
                "board",
                format!("board {} belongs to another team", target.id),
            ));
        }
        let column = column_on_board(&tx, &self.column, &target).await?;

        let mut moving = vec![task.id.clone()];
        let mut subs = Vec::new();
        for id in task.sub_tasks() {
            let sub: Task = tx.load(id).await?;
            moving.push(sub.id.clone());
            subs.push(sub);
        }

        if let Some(source_id) = task.board.as_ref().filter(|b| **b != target.id) {
            if let Some(mut source) = tx.find::<Board>(source_id).await? {
                source.tasks.retain(|id| !moving.contains(id));
                tx.save(source);
            }
        }
        for id in &moving {
            target.push_task(id.clone());
        }

        for mut moved in subs.into_iter().chain(std::iter::once(task.clone())) {
            moved.board = Some(target.id.clone());
            moved.column = column.id.clone();
            moved.location = column.location();
            moved.touch();
            if moved.id == task.id {
                task = moved.clone();
            }
            tx.save(moved);
        }
        tx.save(target);

        let value = task_json(&tx, &task).await?;
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for MoveToBoard {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string(), self.board.to_string()]
    }
}
