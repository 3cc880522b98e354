//! AddColumn command

use super::{custom_name, ensure_unique_name};
use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::processor::ids_at;
use crate::types::{Board, BoardId, Column};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Append a custom column to a board.
///
/// Reserved names (Backlog, TODO, In Progress, Done) are rejected before
/// the store is touched.
#[operation(verb = "add", noun = "column", description = "Add a custom column to a board")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddColumn {
    pub board: BoardId,
    pub name: String,
    /// Hex color without `#`; derived from the name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl AddColumn {
    pub fn new(board: impl Into<BoardId>, name: impl Into<String>) -> Self {
        Self {
            board: board.into(),
            name: name.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let name = custom_name(&self.name)?;
        if let Some(color) = &self.color {
            validate_color(color)?;
        }

        let mut tx = ctx.begin();
        let mut board: Board = tx.load(&self.board).await?;
        ensure_unique_name(&tx, &board, &name, None).await?;

        let mut column = Column::new(name, board.id.clone());
        if let Some(color) = &self.color {
            column = column.with_color(color.to_lowercase());
        }
        board.columns.push(column.id.clone());

        let value = serde_json::to_value(&column)?;
        tx.save(column);
        tx.save(board);
        tx.commit().await?;
        Ok(value)
    }
}

fn validate_color(color: &str) -> Result<()> {
    if color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(KolosError::invalid_value(
            "color",
            format!("'{color}' is not a 6-digit hex color"),
        ))
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for AddColumn {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::TeamId;
    use std::sync::Arc;

    async fn setup() -> (Arc<MemoryStore>, KolosContext, BoardId) {
        let store = Arc::new(MemoryStore::new());
        let ctx = KolosContext::new(store.clone());
        let board = Board::new("Kolos 1", TeamId::from_string("team"));
        let id = board.id.clone();
        let mut tx = ctx.begin();
        tx.save(board);
        tx.commit().await.unwrap();
        (store, ctx, id)
    }

    #[tokio::test]
    async fn test_add_column() {
        let (_store, ctx, board) = setup().await;
        let value = AddColumn::new(board.clone(), "Review")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["name"], "Review");
        assert_eq!(value["color"].as_str().unwrap().len(), 6);

        let board: Board = ctx.begin().load(&board).await.unwrap();
        assert_eq!(board.columns.len(), 1);
    }

    #[tokio::test]
    async fn test_reserved_name_rejected_without_store_access() {
        let (store, ctx, board) = setup().await;
        store.set_offline(true);

        for name in ["TODO", "todo", " Done ", "Backlog", "in progress"] {
            let result = AddColumn::new(board.clone(), name)
                .execute(&ctx)
                .await
                .into_result();
            assert!(
                matches!(result, Err(KolosError::ReservedName { .. })),
                "{name} should be reserved"
            );
        }
        assert_eq!(store.commit_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let (_store, ctx, board) = setup().await;
        AddColumn::new(board.clone(), "Review")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let result = AddColumn::new(board, "review")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KolosError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn test_explicit_color() {
        let (_store, ctx, board) = setup().await;
        let value = AddColumn::new(board.clone(), "Blocked")
            .with_color("D73A4A")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["color"], "d73a4a");

        let bad = AddColumn::new(board, "QA")
            .with_color("red")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(bad, Err(KolosError::InvalidValue { .. })));
    }
}
