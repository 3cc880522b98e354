//! Task types: Task, Hierarchy, TaskType, Location

use super::ids::{BoardId, ColumnId, CommentId, TaskId, TeamId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of work item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[default]
    Issue,
    Bug,
}

/// Where the task is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    #[default]
    Board,
    Backlog,
}

/// A task is either top level (and may own subtasks) or a subtask of exactly
/// one top-level task. Subtasks have nowhere to store children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Hierarchy {
    TopLevel {
        #[serde(default)]
        sub_tasks: Vec<TaskId>,
    },
    Subtask {
        parent: TaskId,
    },
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::TopLevel {
            sub_tasks: Vec::new(),
        }
    }
}

/// A card on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    #[serde(default)]
    pub description: String,
    pub author: UserId,
    pub column: ColumnId,
    /// `None` means backlog-only
    #[serde(default)]
    pub board: Option<BoardId>,
    pub team: TeamId,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    #[serde(default)]
    pub assigned_to: BTreeSet<UserId>,
    #[serde(default)]
    pub hierarchy: Hierarchy,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    /// Opaque attachment URIs
    #[serde(default)]
    pub attachments: Vec<String>,
    /// Newest first
    #[serde(default)]
    pub comments: Vec<CommentId>,
    #[serde(default)]
    pub location: Location,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a top-level task placed in a column of a board
    pub fn new(
        description: impl Into<String>,
        author: UserId,
        team: TeamId,
        board: BoardId,
        column: ColumnId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            description: description.into(),
            author,
            column,
            board: Some(board),
            team,
            task_type: TaskType::default(),
            assigned_to: BTreeSet::new(),
            hierarchy: Hierarchy::default(),
            labels: BTreeSet::new(),
            attachments: Vec::new(),
            comments: Vec::new(),
            location: Location::Board,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a subtask that shares the parent's board, team, and column
    pub fn subtask_of(parent: &Task, description: impl Into<String>, author: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            description: description.into(),
            author,
            column: parent.column.clone(),
            board: parent.board.clone(),
            team: parent.team.clone(),
            task_type: TaskType::default(),
            assigned_to: BTreeSet::new(),
            hierarchy: Hierarchy::Subtask {
                parent: parent.id.clone(),
            },
            labels: BTreeSet::new(),
            attachments: Vec::new(),
            comments: Vec::new(),
            location: parent.location,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the task type
    pub fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    /// Parent id, if this is a subtask
    pub fn parent_id(&self) -> Option<&TaskId> {
        match &self.hierarchy {
            Hierarchy::Subtask { parent } => Some(parent),
            Hierarchy::TopLevel { .. } => None,
        }
    }

    /// Check if this is a subtask
    pub fn is_subtask(&self) -> bool {
        self.parent_id().is_some()
    }

    /// Owned subtask ids (always empty for a subtask)
    pub fn sub_tasks(&self) -> &[TaskId] {
        match &self.hierarchy {
            Hierarchy::TopLevel { sub_tasks } => sub_tasks,
            Hierarchy::Subtask { .. } => &[],
        }
    }

    /// Mutable subtask list, `None` for subtasks
    pub fn sub_tasks_mut(&mut self) -> Option<&mut Vec<TaskId>> {
        match &mut self.hierarchy {
            Hierarchy::TopLevel { sub_tasks } => Some(sub_tasks),
            Hierarchy::Subtask { .. } => None,
        }
    }

    /// Bump `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
