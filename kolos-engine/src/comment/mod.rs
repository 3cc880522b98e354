//! Comment commands
//!
//! A comment always belongs to exactly one task. The task keeps its comment
//! ids newest first.

mod add;
mod delete;
mod update;

pub use add::AddComment;
pub use delete::DeleteComment;
pub use update::UpdateComment;
