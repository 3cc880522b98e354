//! DeleteColumn command

use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::types::{Board, Column, ColumnId, Task};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Delete an empty custom column
#[operation(verb = "delete", noun = "column", description = "Delete an empty custom column")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteColumn {
    pub id: ColumnId,
}

impl DeleteColumn {
    pub fn new(id: impl Into<ColumnId>) -> Self {
        Self { id: id.into() }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let mut tx = ctx.begin();
        let column: Column = tx.load(&self.id).await?;
        if column.is_reserved() {
            return Err(KolosError::ReservedName { name: column.name });
        }

        let occupied = tx
            .list::<Task>()
            .await?
            .iter()
            .filter(|task| task.column == column.id)
            .count();
        if occupied > 0 {
            return Err(KolosError::conflict(format!(
                "column '{}' still holds {occupied} task(s)",
                column.name
            )));
        }

        if let Some(mut board) = tx.find::<Board>(&column.board).await? {
            board.columns.retain(|id| id != &column.id);
            tx.save(board);
        }

        let value = serde_json::json!({ "deleted": true, "id": column.id });
        tx.remove::<Column>(&column.id);
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for DeleteColumn {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}
