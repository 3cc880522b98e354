//! # Kolos Operations
//!
//! This crate provides the `Operation` and `Execute` traits every Kolos command
//! implements. Commands are structs where the fields ARE the parameters.
//!
//! ## Example
//!
//! ```ignore
//! use kolos_operations::*;
//!
//! #[operation(verb = "assign", noun = "task", description = "Replace a task's assignees")]
//! #[derive(Debug, Deserialize, Serialize)]
//! pub struct AssignTask {
//!     pub id: TaskId,
//!     pub users: Vec<UserId>,
//! }
//!
//! #[async_trait]
//! impl Execute<KolosContext, KolosError> for AssignTask {
//!     async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
//!         // mutations return ExecutionResult::Logged, reads ExecutionResult::Unlogged
//!     }
//! }
//! ```

mod event;
mod execution_result;
mod operation;

pub use event::MutationEvent;
pub use execution_result::ExecutionResult;
pub use operation::{Execute, Operation};

// Re-export proc macros
pub use kolos_operations_macros::operation;

// Re-export for use in implementations
pub use async_trait::async_trait;
pub use serde_json::Value;
