//! Operation metadata and execution traits

use crate::ExecutionResult;
use async_trait::async_trait;
use serde_json::Value;

/// Static metadata for a command, implemented by `#[operation]`
pub trait Operation {
    /// The action, e.g. "link"
    fn verb(&self) -> &'static str;

    /// The entity kind acted on, e.g. "task"
    fn noun(&self) -> &'static str;

    /// One-line human description
    fn description(&self) -> &'static str;

    /// Canonical op string ("link task")
    fn op_string(&self) -> String {
        format!("{} {}", self.verb(), self.noun())
    }
}

/// Run a command against a context
#[async_trait]
pub trait Execute<C, E>: Operation + Send + Sync
where
    C: Send + Sync,
{
    /// Execute the command
    async fn execute(&self, ctx: &C) -> ExecutionResult<Value, E>;

    /// Ids of the entities a successful execution touched.
    ///
    /// The processor copies these into the mutation event so subscribers can
    /// decide what to refresh without parsing the output.
    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        Vec::new()
    }
}
