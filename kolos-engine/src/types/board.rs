//! Board-level types: Board, Column

use super::ids::{BoardId, ColumnId, TaskId, TeamId};
use super::task::Location;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A board belongs to one team and orders its columns and tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub team: TeamId,
    /// Rendering and reorder order of the columns
    #[serde(default)]
    pub columns: Vec<ColumnId>,
    /// Canonical column-independent task order, subtasks included
    #[serde(default)]
    pub tasks: Vec<TaskId>,
    pub created_at: DateTime<Utc>,
}

impl Board {
    /// Create an empty board for a team
    pub fn new(name: impl Into<String>, team: TeamId) -> Self {
        Self {
            id: BoardId::new(),
            name: name.into(),
            team,
            columns: Vec::new(),
            tasks: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Check whether a column is part of this board
    pub fn has_column(&self, id: &ColumnId) -> bool {
        self.columns.contains(id)
    }

    /// Remove a task id from the canonical order. Returns true if it was present.
    pub fn remove_task(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t != id);
        self.tasks.len() != before
    }

    /// Append a task id unless already present
    pub fn push_task(&mut self, id: TaskId) {
        if !self.tasks.contains(&id) {
            self.tasks.push(id);
        }
    }
}

/// A column defines a workflow stage on one board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    /// 6-character hex color code without #
    pub color: String,
    pub board: BoardId,
}

impl Column {
    /// Create a column with an auto color derived from its name
    pub fn new(name: impl Into<String>, board: BoardId) -> Self {
        let name = name.into();
        let color = crate::auto_color::auto_color(&name).to_string();
        Self {
            id: ColumnId::new(),
            name,
            color,
            board,
        }
    }

    /// Override the color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Whether this column carries one of the reserved workflow names
    pub fn is_reserved(&self) -> bool {
        crate::defaults::is_reserved_column_name(&self.name)
    }

    /// The reserved column backlog tasks live in
    pub fn is_backlog(&self) -> bool {
        self.name
            .trim()
            .eq_ignore_ascii_case(crate::defaults::BACKLOG_COLUMN)
    }

    /// Where a task placed in this column lives
    pub fn location(&self) -> Location {
        if self.is_backlog() {
            Location::Backlog
        } else {
            Location::Board
        }
    }
}
