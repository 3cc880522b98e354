//! AddUser command

use crate::context::KolosContext;
use crate::error::{non_empty, KolosError, Result};
use crate::processor::ids_at;
use crate::types::{User, UserId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// Register a user
#[operation(verb = "add", noun = "user", description = "Register a user")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddUser {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Explicit id, e.g. to mirror an external identity; generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
}

impl AddUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            id: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<UserId>) -> Self {
        self.id = Some(id.into());
        self
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let mut user = User::new(non_empty("name", &self.name)?);
        if let Some(email) = &self.email {
            user = user.with_email(email.trim());
        }

        let mut tx = ctx.begin();
        if let Some(id) = &self.id {
            if tx.exists::<User>(id).await? {
                return Err(KolosError::duplicate("user", id.as_str()));
            }
            user = user.with_id(id.clone());
        }

        let value = serde_json::to_value(&user)?;
        tx.save(user);
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for AddUser {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        ids_at(result, &["/id"])
    }
}
