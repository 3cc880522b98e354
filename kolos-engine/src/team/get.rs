//! GetTeam command

use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::types::{Board, Team, TeamId, User};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Get a team with its boards and members resolved
#[operation(verb = "get", noun = "team", description = "Get a team with its boards and members")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTeam {
    pub id: TeamId,
}

impl GetTeam {
    pub fn new(id: impl Into<TeamId>) -> Self {
        Self { id: id.into() }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let tx = ctx.begin();
        let team: Team = tx.load(&self.id).await?;

        let mut boards = Vec::new();
        for id in &team.boards {
            if let Some(board) = tx.find::<Board>(id).await? {
                boards.push(serde_json::json!({
                    "id": board.id,
                    "name": board.name,
                    "task_count": board.tasks.len(),
                }));
            }
        }

        let mut members = Vec::new();
        for member in &team.members {
            let name = tx.find::<User>(&member.user).await?.map(|u| u.name);
            members.push(serde_json::json!({
                "user": member.user,
                "name": name,
                "role": member.role,
            }));
        }

        let mut value = serde_json::to_value(&team)?;
        value["boards"] = Value::Array(boards);
        value["members"] = Value::Array(members);
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for GetTeam {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        ExecutionResult::read(self.run(ctx).await)
    }
}
