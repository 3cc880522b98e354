//! Team: members, boards, and the flat task index

use super::ids::{BoardId, TaskId, TeamId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role of a member inside a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Member,
}

/// A user's membership in a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user: UserId,
    pub role: Role,
}

/// Subscription tier. Stored only; billing lives outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTier {
    #[default]
    Free,
    Pro,
    Enterprise,
}

/// A team owns boards and indexes every task on them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub boards: Vec<BoardId>,
    /// Flat index across all boards. Every id here lives on a board in `boards`.
    #[serde(default)]
    pub tasks: Vec<TaskId>,
    /// 6-character hex color code without #
    pub theme: String,
    #[serde(default)]
    pub plan: PlanTier,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Create a team whose first member is its admin
    pub fn new(name: impl Into<String>, admin: UserId, theme: impl Into<String>) -> Self {
        Self {
            id: TeamId::new(),
            name: name.into(),
            members: vec![Member {
                user: admin,
                role: Role::Admin,
            }],
            boards: Vec::new(),
            tasks: Vec::new(),
            theme: theme.into(),
            plan: PlanTier::default(),
            created_at: Utc::now(),
        }
    }

    /// Role of a user, if they are a member
    pub fn role_of(&self, user: &UserId) -> Option<Role> {
        self.members
            .iter()
            .find(|m| &m.user == user)
            .map(|m| m.role)
    }

    /// Check membership
    pub fn is_member(&self, user: &UserId) -> bool {
        self.role_of(user).is_some()
    }

    /// Number of admins
    pub fn admin_count(&self) -> usize {
        self.members
            .iter()
            .filter(|m| m.role == Role::Admin)
            .count()
    }

    /// Remove a task id from the flat index. Returns true if it was present.
    pub fn remove_task(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t != id);
        self.tasks.len() != before
    }

    /// Append a task id unless already indexed
    pub fn index_task(&mut self, id: TaskId) {
        if !self.tasks.contains(&id) {
            self.tasks.push(id);
        }
    }
}
