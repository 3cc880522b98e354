//! AddBoard command

use super::seed_columns;
use crate::context::KolosContext;
use crate::error::{non_empty, KolosError, Result};
use crate::processor::ids_at;
use crate::types::{Board, Team, TeamId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::info;

/// Add a board to a team. New boards start with the reserved columns.
#[operation(verb = "add", noun = "board", description = "Add a board to a team")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBoard {
    pub team: TeamId,
    pub name: String,
}

impl AddBoard {
    pub fn new(team: impl Into<TeamId>, name: impl Into<String>) -> Self {
        Self {
            team: team.into(),
            name: name.into(),
        }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let name = non_empty("name", &self.name)?;

        let mut tx = ctx.begin();
        let mut team: Team = tx.load(&self.team).await?;

        let mut board = Board::new(name, team.id.clone());
        let columns = seed_columns(&board.id);
        board.columns = columns.iter().map(|c| c.id.clone()).collect();
        team.boards.push(board.id.clone());

        let value = serde_json::json!({ "board": board, "columns": columns });
        info!(team = %team.id, board = %board.id, "board added");

        for column in columns {
            tx.save(column);
        }
        tx.save(board);
        tx.save(team);
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for AddBoard {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        let mut ids = vec![self.team.to_string()];
        ids.extend(ids_at(result, &["/board/id"]));
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::CreateTeam;
    use crate::user::AddUser;

    #[tokio::test]
    async fn test_add_board() {
        let ctx = KolosContext::in_memory();
        AddUser::new("Ada").with_id("ada").execute(&ctx).await.into_result().unwrap();
        let created = CreateTeam::new("Core", "ada")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let team_id = created["team"]["id"].as_str().unwrap();

        let value = AddBoard::new(team_id, "Roadmap")
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["board"]["name"], "Roadmap");
        assert_eq!(value["columns"].as_array().unwrap().len(), 4);

        let team: Team = ctx.begin().load(&team_id.into()).await.unwrap();
        assert_eq!(team.boards.len(), 2);
    }

    #[tokio::test]
    async fn test_add_board_missing_team() {
        let ctx = KolosContext::in_memory();
        let result = AddBoard::new("nope", "Roadmap")
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KolosError::NotFound { .. })));
    }
}
