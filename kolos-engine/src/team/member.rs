//! Team membership commands

use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::processor::ids_at;
use crate::types::{Member, Role, Team, TeamId, UserId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

fn default_role() -> Role {
    Role::Member
}

/// Add a member to a team, or change an existing member's role
#[operation(verb = "add", noun = "member", description = "Add a user to a team or change their role")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMember {
    pub team: TeamId,
    pub user: UserId,
    #[serde(default = "default_role")]
    pub role: Role,
}

impl AddMember {
    pub fn new(team: impl Into<TeamId>, user: impl Into<UserId>) -> Self {
        Self {
            team: team.into(),
            user: user.into(),
            role: Role::Member,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let mut tx = ctx.begin();
        let mut team: Team = tx.load(&self.team).await?;
        let user = ctx.resolve_user(&tx, &self.user).await?;

        let admins = team.admin_count();
        match team.members.iter_mut().find(|m| m.user == user) {
            Some(existing) => {
                if existing.role == Role::Admin && self.role != Role::Admin && admins == 1 {
                    return Err(KolosError::conflict(format!(
                        "{user} is the last admin of team {}",
                        self.team
                    )));
                }
                existing.role = self.role;
            }
            None => team.members.push(Member {
                user,
                role: self.role,
            }),
        }

        let value = serde_json::to_value(&team)?;
        tx.save(team);
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for AddMember {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        let mut ids = ids_at(result, &["/id"]);
        ids.push(self.user.to_string());
        ids
    }
}

/// Remove a member from a team. The last admin cannot be removed.
#[operation(verb = "remove", noun = "member", description = "Remove a user from a team")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveMember {
    pub team: TeamId,
    pub user: UserId,
}

impl RemoveMember {
    pub fn new(team: impl Into<TeamId>, user: impl Into<UserId>) -> Self {
        Self {
            team: team.into(),
            user: user.into(),
        }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let mut tx = ctx.begin();
        let mut team: Team = tx.load(&self.team).await?;

        let role = team
            .role_of(&self.user)
            .ok_or_else(|| KolosError::not_found("member", &self.user))?;
        if role == Role::Admin && team.admin_count() == 1 {
            return Err(KolosError::conflict(format!(
                "{} is the last admin of team {}",
                self.user, self.team
            )));
        }

        team.members.retain(|m| m.user != self.user);

        let value = serde_json::to_value(&team)?;
        tx.save(team);
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for RemoveMember {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.team.to_string(), self.user.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::CreateTeam;
    use crate::user::AddUser;

    async fn setup() -> (KolosContext, String, String, String) {
        let ctx = KolosContext::in_memory();
        let ada = AddUser::new("Ada").execute(&ctx).await.into_result().unwrap();
        let bob = AddUser::new("Bob").execute(&ctx).await.into_result().unwrap();
        let ada = ada["id"].as_str().unwrap().to_string();
        let bob = bob["id"].as_str().unwrap().to_string();
        let created = CreateTeam::new("Core", ada.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let team = created["team"]["id"].as_str().unwrap().to_string();
        (ctx, team, ada, bob)
    }

    #[tokio::test]
    async fn test_add_member() {
        let (ctx, team, _ada, bob) = setup().await;
        let value = AddMember::new(team.as_str(), bob.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["members"].as_array().unwrap().len(), 2);
        assert_eq!(value["members"][1]["role"], "member");
    }

    #[tokio::test]
    async fn test_add_member_is_upsert() {
        let (ctx, team, _ada, bob) = setup().await;
        AddMember::new(team.as_str(), bob.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        let value = AddMember::new(team.as_str(), bob.as_str())
            .with_role(Role::Admin)
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["members"].as_array().unwrap().len(), 2);
        assert_eq!(value["members"][1]["role"], "admin");
    }

    #[tokio::test]
    async fn test_cannot_demote_last_admin() {
        let (ctx, team, ada, _bob) = setup().await;
        let result = AddMember::new(team.as_str(), ada.as_str())
            .with_role(Role::Member)
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KolosError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_remove_member() {
        let (ctx, team, _ada, bob) = setup().await;
        AddMember::new(team.as_str(), bob.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();

        let value = RemoveMember::new(team.as_str(), bob.as_str())
            .execute(&ctx)
            .await
            .into_result()
            .unwrap();
        assert_eq!(value["members"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cannot_remove_last_admin() {
        let (ctx, team, ada, _bob) = setup().await;
        let result = RemoveMember::new(team.as_str(), ada.as_str())
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KolosError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_remove_non_member() {
        let (ctx, team, _ada, bob) = setup().await;
        let result = RemoveMember::new(team.as_str(), bob.as_str())
            .execute(&ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KolosError::NotFound { .. })));
    }
}
