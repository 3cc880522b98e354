//! UpdateLabels command

use super::task_json;
use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::types::{Task, TaskId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::time::Instant;

/// Trim labels into a set, rejecting blanks
pub(super) fn normalize(labels: &[String]) -> Result<BTreeSet<String>> {
    labels
        .iter()
        .map(|label| {
            let label = label.trim();
            if label.is_empty() {
                Err(KolosError::invalid_value("labels", "labels must not be empty"))
            } else {
                Ok(label.to_string())
            }
        })
        .collect()
}

/// Replace a task's label set
#[operation(verb = "label", noun = "task", description = "Replace the labels on a task")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateLabels {
    pub id: TaskId,
    pub labels: Vec<String>,
}

impl UpdateLabels {
    pub fn new<I, S>(id: impl Into<TaskId>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let labels = normalize(&self.labels)?;

        let mut tx = ctx.begin();
        let mut task: Task = tx.load(&self.id).await?;
        if task.labels != labels {
            task.labels = labels;
            task.touch();
            tx.save(task.clone());
        }

        let value = task_json(&tx, &task).await?;
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for UpdateLabels {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        vec![self.id.to_string()]
    }
}
