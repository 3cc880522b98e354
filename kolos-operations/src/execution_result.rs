//! Execution result types for operations

use crate::{MutationEvent, Operation};
use serde_json::Value;
use std::time::Instant;

/// Result of executing an operation
///
/// Distinguishes between:
/// - Logged: mutations, which produce an event for the notification layer
/// - Unlogged: read-only operations with no side effects
/// - Failed: errors (optionally recorded)
pub enum ExecutionResult<T, E> {
    /// Operation succeeded and mutated state
    Logged { value: T, event: MutationEvent },
    /// Operation succeeded without side effects
    Unlogged { value: T },
    /// Operation failed
    Failed {
        error: E,
        event: Option<MutationEvent>,
    },
}

impl<T, E> ExecutionResult<T, E> {
    /// Extract the result (Ok or Err)
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Logged { value, .. } => Ok(value),
            Self::Unlogged { value } => Ok(value),
            Self::Failed { error, .. } => Err(error),
        }
    }

    /// Get the value and event separately
    pub fn split(self) -> (Result<T, E>, Option<MutationEvent>) {
        match self {
            Self::Logged { value, event } => (Ok(value), Some(event)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error, event } => (Err(error), event),
        }
    }

    /// Check if this carries an event
    pub fn should_log(&self) -> bool {
        matches!(
            self,
            Self::Logged { .. } | Self::Failed { event: Some(_), .. }
        )
    }
}

impl<E: std::fmt::Display> ExecutionResult<Value, E> {
    /// Wrap the outcome of a mutating command.
    ///
    /// Failures keep an event too so they can be traced, but only `Logged`
    /// results are ever published.
    pub fn mutation<O: Operation + ?Sized>(
        op: &O,
        input: Value,
        result: Result<Value, E>,
        started: Instant,
    ) -> Self {
        let duration_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(value) => Self::Logged {
                event: MutationEvent::new(op.noun(), op.verb(), input, value.clone(), duration_ms),
                value,
            },
            Err(error) => {
                let output = serde_json::json!({ "error": error.to_string() });
                Self::Failed {
                    event: Some(MutationEvent::new(
                        op.noun(),
                        op.verb(),
                        input,
                        output,
                        duration_ms,
                    )),
                    error,
                }
            }
        }
    }

    /// Wrap the outcome of a read-only command
    pub fn read(result: Result<Value, E>) -> Self {
        match result {
            Ok(value) => Self::Unlogged { value },
            Err(error) => Self::Failed { error, event: None },
        }
    }
}
