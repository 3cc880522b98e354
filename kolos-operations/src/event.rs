//! Mutation events handed to the notification layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record of one successful (or attempted) mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationEvent {
    /// Unique ID for this event (ULID format)
    pub id: String,

    /// When the operation completed
    pub timestamp: DateTime<Utc>,

    /// Entity kind the operation acted on ("task", "board", ...)
    pub entity: String,

    /// The action performed ("link", "delete", ...)
    pub operation: String,

    /// Ids of every entity the operation touched
    #[serde(default)]
    pub affected_ids: Vec<String>,

    /// The normalized input parameters (as JSON)
    pub input: Value,

    /// The result value or error (as JSON)
    pub output: Value,

    /// Who performed the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// How long the operation took (milliseconds)
    pub duration_ms: u64,
}

impl MutationEvent {
    /// Create a new event
    pub fn new(
        entity: impl Into<String>,
        operation: impl Into<String>,
        input: Value,
        output: Value,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            timestamp: Utc::now(),
            entity: entity.into(),
            operation: operation.into(),
            affected_ids: Vec::new(),
            input,
            output,
            actor: None,
            duration_ms,
        }
    }

    /// Canonical op string ("delete task")
    pub fn op(&self) -> String {
        format!("{} {}", self.operation, self.entity)
    }

    /// Set the actor
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    /// Set the affected ids
    pub fn with_affected_ids(mut self, ids: Vec<String>) -> Self {
        self.affected_ids = ids;
        self
    }

    /// Whether this event records a failure
    pub fn is_failure(&self) -> bool {
        self.output.get("error").is_some()
    }
}
