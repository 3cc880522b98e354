//! Column commands

mod add;
mod delete;
mod list;
mod rename;

pub use add::AddColumn;
pub use delete::DeleteColumn;
pub use list::ListColumnTasks;
pub use rename::RenameColumn;

use crate::defaults::is_reserved_column_name;
use crate::error::{non_empty, KolosError, Result};
use crate::store::Transaction;
use crate::types::{Board, Column, ColumnId};

/// Validate a custom column name. Touches no storage.
fn custom_name(name: &str) -> Result<String> {
    let name = non_empty("name", name)?;
    if is_reserved_column_name(&name) {
        return Err(KolosError::ReservedName { name });
    }
    Ok(name)
}

/// Reject a name already used by another column on the board
async fn ensure_unique_name(
    tx: &Transaction<'_>,
    board: &Board,
    name: &str,
    except: Option<&ColumnId>,
) -> Result<()> {
    for id in board.columns.iter().filter(|id| Some(*id) != except) {
        if let Some(column) = tx.find::<Column>(id).await? {
            if column.name.trim().eq_ignore_ascii_case(name) {
                return Err(KolosError::duplicate("column", name));
            }
        }
    }
    Ok(())
}
