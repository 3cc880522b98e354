//! Persist a new column order or canonical task order for a board

use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::types::{Board, BoardId, ColumnId, TaskId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt::Display;
use std::time::Instant;

/// Check that `proposed` holds exactly the ids in `current`, each once
pub(crate) fn ensure_permutation<T>(field: &str, current: &[T], proposed: &[T]) -> Result<()>
where
    T: Ord + Display,
{
    let unique: BTreeSet<&T> = proposed.iter().collect();
    if unique.len() != proposed.len() {
        return Err(KolosError::invalid_value(field, "contains duplicate ids"));
    }

    let existing: BTreeSet<&T> = current.iter().collect();
    if let Some(extra) = unique.difference(&existing).next() {
        return Err(KolosError::invalid_value(
            field,
            format!("{extra} is not on this board"),
        ));
    }
    if let Some(missing) = existing.difference(&unique).next() {
        return Err(KolosError::invalid_value(field, format!("{missing} is missing")));
    }
    Ok(())
}

/// Rewrite a board's column order
#[operation(verb = "reorder", noun = "columns", description = "Rewrite the column order of a board")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderColumns {
    pub board: BoardId,
    pub columns: Vec<ColumnId>,
}

impl ReorderColumns {
    pub fn new(board: impl Into<BoardId>, columns: Vec<ColumnId>) -> Self {
        Self {
            board: board.into(),
            columns,
        }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let mut tx = ctx.begin();
        let mut board: Board = tx.load(&self.board).await?;
        ensure_permutation("columns", &board.columns, &self.columns)?;

        board.columns = self.columns.clone();
        let value = serde_json::to_value(&board)?;
        tx.save(board);
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for ReorderColumns {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.board.to_string()]
    }
}

/// Rewrite a board's canonical task order
#[operation(verb = "reorder", noun = "tasks", description = "Rewrite the canonical task order of a board")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderBoardTasks {
    pub board: BoardId,
    pub tasks: Vec<TaskId>,
}

impl ReorderBoardTasks {
    pub fn new(board: impl Into<BoardId>, tasks: Vec<TaskId>) -> Self {
        Self {
            board: board.into(),
            tasks,
        }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let mut tx = ctx.begin();
        let mut board: Board = tx.load(&self.board).await?;
        ensure_permutation("tasks", &board.tasks, &self.tasks)?;

        board.tasks = self.tasks.clone();
        let value = serde_json::to_value(&board)?;
        tx.save(board);
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for ReorderBoardTasks {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.board.to_string()]
    }
}
