//! Built-in workflow columns and team seed content.

/// Columns every new board starts with, in board order.
pub const RESERVED_COLUMNS: [&str; 4] = ["Backlog", "TODO", "In Progress", "Done"];

/// The reserved column backlog tasks live in
pub const BACKLOG_COLUMN: &str = "Backlog";

/// The reserved column seed tasks are placed in
pub const TODO_COLUMN: &str = "TODO";

/// Default name of the first board of a new team
pub const DEFAULT_BOARD_NAME: &str = "Kolos 1";

/// Default description of the seed task
pub const DEFAULT_SEED_TASK: &str = "Welcome to Kolos! Drag this card to another column to get started.";

/// Default body of the seed comment
pub const DEFAULT_SEED_COMMENT: &str = "Comments show up here, newest first.";

/// Default team theme color
pub const DEFAULT_THEME: &str = "5319e7";

/// Check a column name against the reserved set (trimmed, case-insensitive)
pub fn is_reserved_column_name(name: &str) -> bool {
    let name = name.trim();
    RESERVED_COLUMNS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_names() {
        assert!(is_reserved_column_name("TODO"));
        assert!(is_reserved_column_name("todo"));
        assert!(is_reserved_column_name(" In Progress "));
        assert!(is_reserved_column_name("backlog"));
        assert!(!is_reserved_column_name("Review"));
        assert!(!is_reserved_column_name("To Do"));
    }
}
