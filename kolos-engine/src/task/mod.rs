//! Task graph commands
//!
//! Every command here validates its references before staging a write and
//! commits everything it changes in one transaction, so the relational
//! invariants between tasks, boards, teams, comments and links hold after
//! each call or nothing changed.

mod add;
mod assign;
mod attachments;
mod cascade;
mod delete;
mod get;
mod labels;
mod link;
mod location;
mod mv;
mod subtask;
mod update;

pub use add::AddTask;
pub use assign::AssignTask;
pub use attachments::{AddAttachments, RemoveAttachments};
pub use cascade::{CascadePlan, CascadeReport};
pub use delete::{DeleteTask, DeleteTasks};
pub use get::GetTask;
pub use labels::UpdateLabels;
pub use link::{LinkOp, LinkTasks};
pub use location::SetLocation;
pub use mv::{MoveTask, MoveToBoard};
pub use subtask::CreateSubtask;
pub use update::UpdateTask;

use crate::error::{KolosError, Result};
use crate::store::Transaction;
use crate::types::{Board, BoardId, Column, ColumnId, Task};
use serde_json::Value;

/// Load a column and check that it sits on `board`
async fn column_on_board(
    tx: &Transaction<'_>,
    column: &ColumnId,
    board: &Board,
) -> Result<Column> {
    let column: Column = tx.load(column).await?;
    if column.board != board.id || !board.has_column(&column.id) {
        return Err(KolosError::invalid_hierarchy(format!(
            "column {} is not on board {}",
            column.id, board.id
        )));
    }
    Ok(column)
}

/// The board a task lives on, failing for backlog-only tasks
fn board_of(task: &Task) -> Result<&BoardId> {
    task.board.as_ref().ok_or_else(|| {
        KolosError::conflict(format!("task {} is not on any board", task.id))
    })
}

/// A task as JSON with its derived link views
async fn task_json(tx: &Transaction<'_>, task: &Task) -> Result<Value> {
    let mut value = serde_json::to_value(task)?;
    value["linked_tasks"] = serde_json::to_value(tx.links_from(&task.id).await?)?;
    value["tasks_linked_to_this"] = serde_json::to_value(tx.links_to(&task.id).await?)?;
    Ok(value)
}
