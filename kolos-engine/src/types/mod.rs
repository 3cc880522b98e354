//! Core types for the Kolos engine

mod board;
mod comment;
mod ids;
mod link;
mod task;
mod team;
mod user;

// Re-export all types
pub use board::{Board, Column};
pub use comment::Comment;
pub use ids::{BoardId, ColumnId, CommentId, TaskId, TeamId, UserId};
pub use link::LinkEdge;
pub use task::{Hierarchy, Location, Task, TaskType};
pub use team::{Member, PlanTier, Role, Team};
pub use user::User;
