//! Render-ready views produced by the assembler

use crate::reorder::Card;
use crate::types::{
    Board, BoardId, Column, ColumnId, CommentId, Location, TaskId, TaskType, TeamId, User, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    pub id: UserId,
    pub name: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnView {
    pub id: ColumnId,
    pub name: String,
    pub color: String,
    pub reserved: bool,
}

impl From<Column> for ColumnView {
    fn from(column: Column) -> Self {
        Self {
            reserved: column.is_reserved(),
            id: column.id,
            name: column.name,
            color: column.color,
        }
    }
}

impl ColumnView {
    /// Where a task placed in this column lives
    pub fn location(&self) -> Location {
        if self
            .name
            .trim()
            .eq_ignore_ascii_case(crate::defaults::BACKLOG_COLUMN)
        {
            Location::Backlog
        } else {
            Location::Board
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: CommentId,
    pub content: String,
    /// `None` when the author no longer resolves
    pub author: Option<UserView>,
    pub attachments: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    pub id: TaskId,
    pub description: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub column: ColumnId,
    pub board: Option<BoardId>,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<TaskId>,
    pub author: Option<UserView>,
    pub assigned_to: Vec<UserView>,
    pub labels: Vec<String>,
    pub attachments: Vec<String>,
    /// Newest first
    pub comments: Vec<CommentView>,
    pub sub_tasks: Vec<TaskView>,
    pub linked_tasks: Vec<TaskId>,
    pub tasks_linked_to_this: Vec<TaskId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fully hydrated board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub board: Board,
    pub team_id: TeamId,
    /// In board order
    pub columns: Vec<ColumnView>,
    /// Top-level tasks in the board's canonical order
    pub tasks: Vec<TaskView>,
}

impl BoardSnapshot {
    /// Find a top-level task or a subtask
    pub fn task(&self, id: &TaskId) -> Option<&TaskView> {
        self.tasks.iter().find_map(|task| {
            if &task.id == id {
                Some(task)
            } else {
                task.sub_tasks.iter().find(|sub| &sub.id == id)
            }
        })
    }

    /// Top-level tasks in one column, in board order
    pub fn column_tasks(&self, column: &ColumnId) -> Vec<&TaskView> {
        self.tasks.iter().filter(|t| &t.column == column).collect()
    }

    pub fn column(&self, id: &ColumnId) -> Option<&ColumnView> {
        self.columns.iter().find(|c| &c.id == id)
    }

    /// Column ids in board order
    pub fn column_ids(&self) -> Vec<ColumnId> {
        self.columns.iter().map(|c| c.id.clone()).collect()
    }

    /// The board's canonical task list with each task's column, subtasks
    /// included. Ids that no longer resolve are left out.
    pub fn cards(&self) -> Vec<Card> {
        self.board
            .tasks
            .iter()
            .filter_map(|id| self.task(id))
            .map(|task| Card {
                id: task.id.clone(),
                column: task.column.clone(),
            })
            .collect()
    }

    fn task_mut(&mut self, id: &TaskId) -> Option<&mut TaskView> {
        self.tasks.iter_mut().find_map(|task| {
            if &task.id == id {
                Some(task)
            } else {
                task.sub_tasks.iter_mut().find(|sub| &sub.id == id)
            }
        })
    }

    /// Reflect a drop locally: new canonical order, and a new column for the
    /// dragged card when it crossed columns
    pub(crate) fn apply_card_order(
        &mut self,
        task: &TaskId,
        column: Option<&ColumnId>,
        order: &[TaskId],
    ) {
        if let Some(column) = column {
            let location = self.column(column).map(ColumnView::location);
            if let Some(view) = self.task_mut(task) {
                view.column = column.clone();
                if let Some(location) = location {
                    view.location = location;
                }
            }
        }

        let position = |id: &TaskId| order.iter().position(|o| o == id).unwrap_or(usize::MAX);
        self.tasks.sort_by_key(|t| position(&t.id));
        self.board.tasks = order.to_vec();
    }

    /// Reflect a column drop locally
    pub(crate) fn apply_column_order(&mut self, order: &[ColumnId]) {
        let position = |id: &ColumnId| order.iter().position(|o| o == id).unwrap_or(usize::MAX);
        self.columns.sort_by_key(|c| position(&c.id));
        self.board.columns = order.to_vec();
    }
}
