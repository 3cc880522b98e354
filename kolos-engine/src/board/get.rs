//! GetBoard command

use crate::assembly::BoardAssembler;
use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::types::BoardId;
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Get a fully hydrated board snapshot
#[operation(verb = "get", noun = "board", description = "Get a board with columns, tasks, subtasks and comments")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBoard {
    pub id: BoardId,
}

impl GetBoard {
    pub fn new(id: impl Into<BoardId>) -> Self {
        Self { id: id.into() }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let tx = ctx.begin();
        let snapshot = BoardAssembler::new(&tx).await?.assemble(&self.id).await?;
        Ok(serde_json::to_value(snapshot)?)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for GetBoard {
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
    async fn test_get_board_after_team_creation() {
        let ctx = KolosContext::in_memory();
        AddUser::new("Ada").with_id("ada").execute(&ctx).await.into_result().unwrap();
        let created = CreateTeam::new("Core", "ada")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let board_id = created["board"]["id"].as_str().unwrap();
        let value = GetBoard::new(board_id)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        assert_eq!(value["board"]["name"], "Kolos 1");
        assert_eq!(value["team_id"], created["team"]["id"]);
        assert_eq!(value["columns"].as_array().unwrap().len(), 4);
        assert_eq!(value["columns"][1]["name"], "TODO");
        assert_eq!(value["tasks"][0]["column"], value["columns"][1]["id"]);
        assert_eq!(value["tasks"][0]["author"]["name"], "Ada");
        assert_eq!(value["tasks"][0]["comments"].as_array().unwrap().len(), 1);
    }
}
