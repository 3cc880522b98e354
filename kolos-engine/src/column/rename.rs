//! RenameColumn command

use super::{custom_name, ensure_unique_name};
use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::types::{Board, Column, ColumnId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Rename a custom column. Reserved columns keep their names.
#[operation(verb = "rename", noun = "column", description = "Rename a custom column")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameColumn {
    pub id: ColumnId,
    pub name: String,
}

impl RenameColumn {
    pub fn new(id: impl Into<ColumnId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let name = custom_name(&self.name)?;

        let mut tx = ctx.begin();
        let mut column: Column = tx.load(&self.id).await?;
        if column.is_reserved() {
            return Err(KolosError::ReservedName { name: column.name });
        }

        let board: Board = tx.load(&column.board).await?;
        ensure_unique_name(&tx, &board, &name, Some(&column.id)).await?;

        column.name = name;
        let value = serde_json::to_value(&column)?;
        tx.save(column);
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for RenameColumn {
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
    use crate::types::TeamId;

    async fn setup() -> (KolosContext, Column, Column) {
        let ctx = KolosContext::in_memory();
        let mut board = Board::new("Kolos 1", TeamId::from_string("team"));
        let todo = Column::new("TODO", board.id.clone());
        let review = Column::new("Review", board.id.clone());
        board.columns = vec![todo.id.clone(), review.id.clone()];
        let mut tx = ctx.begin();
        tx.save(board);
        tx.save(todo.clone());
        tx.save(review.clone());
        tx.commit().await.unwrap();
        (ctx, todo, review)
    }

    #[tokio::test]
    async fn test_rename_custom_column() {
        let (ctx, _todo, review) = setup().await;
        let value = RenameColumn::new(review.id, "Code Review")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["name"], "Code Review");
    }

    #[tokio::test]
    async fn test_reserved_column_keeps_name() {
        let (ctx, todo, _review) = setup().await;
        let result = RenameColumn::new(todo.id, "Later")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KolosError::ReservedName { .. })));
    }

    #[tokio::test]
    async fn test_cannot_rename_to_reserved() {
        let (ctx, _todo, review) = setup().await;
        let result = RenameColumn::new(review.id, "Done")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KolosError::ReservedName { .. })));
    }

    #[tokio::test]
    async fn test_rename_same_name_different_case() {
        let (ctx, _todo, review) = setup().await;
        let value = RenameColumn::new(review.id, "REVIEW")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["name"], "REVIEW");
    }
}
