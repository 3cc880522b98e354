//! Board commands

mod add;
mod get;
mod rename;
mod reorder;

pub use add::AddBoard;
pub use get::GetBoard;
pub use rename::RenameBoard;
pub use reorder::{ReorderBoardTasks, ReorderColumns};

pub(crate) use reorder::ensure_permutation;

use crate::defaults::RESERVED_COLUMNS;
use crate::types::{BoardId, Column};

/// The reserved workflow columns every new board starts with, in board order
pub(crate) fn seed_columns(board: &BoardId) -> Vec<Column> {
    RESERVED_COLUMNS
        .iter()
        .map(|name| Column::new(*name, board.clone()))
        .collect()
}
