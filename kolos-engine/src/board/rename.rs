//! RenameBoard command

use crate::context::KolosContext;
use crate::error::{non_empty, KolosError, Result};
use crate::types::{Board, BoardId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

#[operation(verb = "rename", noun = "board", description = "Rename a board")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameBoard {
    pub id: BoardId,
    pub name: String,
}

impl RenameBoard {
    pub fn new(id: impl Into<BoardId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let name = non_empty("name", &self.name)?;
        let mut tx = ctx.begin();
        let mut board: Board = tx.load(&self.id).await?;
        board.name = name;

        let value = serde_json::to_value(&board)?;
        tx.save(board);
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for RenameBoard {
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

    #[tokio::test]
    async fn test_rename_board() {
        let ctx = KolosContext::in_memory();
        let board = Board::new("Old", TeamId::from_string("team"));
        let id = board.id.clone();
        let mut tx = ctx.begin();
        tx.save(board);
        tx.commit().await.unwrap();

        let value = RenameBoard::new(id.clone(), " New ")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["name"], "New");
    }
}
