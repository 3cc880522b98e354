//! ListColumnTasks command

use crate::assembly::BoardAssembler;
use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::types::{BoardId, ColumnId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// List one column's top-level tasks in board order, fully hydrated
#[operation(verb = "list", noun = "tasks", description = "List the tasks in a column in board order")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListColumnTasks {
    pub board: BoardId,
    pub column: ColumnId,
}

impl ListColumnTasks {
    pub fn new(board: impl Into<BoardId>, column: impl Into<ColumnId>) -> Self {
        Self {
            board: board.into(),
            column: column.into(),
        }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let tx = ctx.begin();
        let snapshot = BoardAssembler::new(&tx).await?.assemble(&self.board).await?;
        if snapshot.column(&self.column).is_none() {
            return Err(KolosError::not_found("column", &self.column));
        }

        let tasks = snapshot.column_tasks(&self.column);
        Ok(serde_json::json!({
            "column": self.column,
            "tasks": tasks,
            "count": tasks.len(),
        }))
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for ListColumnTasks {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        ExecutionResult::read(self.run(ctx).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::CreateTeam;
    use crate::user::AddUser;

    #[tokio::test]
    async fn test_list_column_tasks() {
        let ctx = KolosContext::in_memory();
        AddUser::new("Ada").with_id("ada").execute(&ctx).await.into_result().unwrap();
        let created = CreateTeam::new("Core", "ada")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let board = created["board"]["id"].as_str().unwrap();
        let backlog = created["columns"][0]["id"].as_str().unwrap();
        let todo = created["columns"][1]["id"].as_str().unwrap();

        let value = ListColumnTasks::new(board, todo)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["count"], 1);

        let value = ListColumnTasks::new(board, backlog)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["count"], 0);

        let missing = ListColumnTasks::new(board, "nope")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(missing, Err(KolosError::NotFound { .. })));
    }
}
