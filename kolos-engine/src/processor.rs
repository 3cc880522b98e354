//! Runs commands and hands their mutation events to the notification layer

use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use kolos_operations::{Execute, Operation};
use serde_json::Value;
use tracing::{debug, warn};

/// Executes operations against a [`KolosContext`].
///
/// Successful mutations are stamped with the actor and the ids they touched,
/// then published to the context's event sink. Failed operations are traced
/// and never published; read-only operations produce no event at all.
#[derive(Debug, Default, Clone)]
pub struct KolosOperationProcessor {
    actor: Option<String>,
}

impl KolosOperationProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute every event to `actor`
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Run an operation
    pub async fn process<O>(&self, operation: &O, ctx: &KolosContext) -> Result<Value>
    where
        O: Execute<KolosContext, KolosError>,
    {
        let (result, event) = operation.execute(ctx).await.split();

        match (&result, event) {
            (Ok(value), Some(event)) => {
                let mut event =
                    event.with_affected_ids(operation.affected_resource_ids(value));
                if let Some(actor) = &self.actor {
                    event = event.with_actor(actor.clone());
                }
                debug!(op = %event.op(), affected = event.affected_ids.len(), "publishing event");
                // The mutation is already committed; a lost event is not a failed operation
                if let Err(e) = ctx.events().publish(&event).await {
                    warn!(op = %event.op(), error = %e, "failed to publish event");
                }
            }
            (Err(error), Some(event)) => {
                warn!(op = %event.op(), %error, "operation failed");
            }
            (Err(error), None) => {
                debug!(op = %operation.op_string(), %error, "read failed");
            }
            (Ok(_), None) => {}
        }

        result
    }
}

/// Collect string ids found at JSON pointers into a command's output
pub(crate) fn ids_at(value: &Value, pointers: &[&str]) -> Vec<String> {
    pointers
        .iter()
        .filter_map(|pointer| value.pointer(pointer))
        .flat_map(|found| match found {
            Value::String(id) => vec![id.clone()],
            Value::Array(items) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        })
        .collect()
}
