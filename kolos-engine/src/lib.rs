//! # Kolos engine
//!
//! Ordering and relational-integrity engine for team task boards.
//!
//! Teams own boards, boards own ordered columns and tasks, tasks nest one level
//! as subtasks, link to each other, and carry comments, labels and attachments.
//! Every change goes through a command executed against a [`KolosContext`]:
//!
//! ```ignore
//! use kolos_engine::{team::CreateTeam, KolosContext, KolosOperationProcessor};
//!
//! let ctx = KolosContext::in_memory();
//! let processor = KolosOperationProcessor::new().with_actor("u1");
//! let team = processor.process(&CreateTeam::new("Core", "u1"), &ctx).await?;
//! ```
//!
//! ## Layout
//!
//! - [`store`]: persistence boundary, transactions, memory and file stores
//! - [`task`]: task graph mutations and the cascading delete
//! - [`reorder`]: drag-and-drop placement and the optimistic board cache
//! - [`assembly`]: read path producing render-ready board snapshots

mod auto_color;
pub mod defaults;
mod error;

pub mod config;
mod context;
pub mod identity;
pub mod notify;
mod processor;
pub mod store;
pub mod types;

pub mod assembly;
pub mod board;
pub mod column;
pub mod comment;
pub mod reorder;
pub mod task;
pub mod team;
pub mod user;

pub use auto_color::auto_color;
pub use config::KolosConfig;
pub use context::KolosContext;
pub use error::{KolosError, Result};
pub use processor::KolosOperationProcessor;

// Re-export the operation traits so callers need a single dependency
pub use kolos_operations::{async_trait, Execute, ExecutionResult, MutationEvent, Operation};
