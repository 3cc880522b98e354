//! DeleteTask and DeleteTasks commands

use super::cascade::{CascadePlan, CascadeReport, Removed};
use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::processor::ids_at;
use crate::types::TaskId;
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::info;

fn report_json(report: &CascadeReport) -> Result<Value> {
    let mut value = serde_json::to_value(report)?;
    value["deleted"] = Value::Bool(true);
    Ok(value)
}

/// Delete a task and everything it owns in one transaction
#[operation(verb = "delete", noun = "task", description = "Delete a task with its comments, subtasks and links")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTask {
    pub id: TaskId,
    /// Dependents gathered by the caller; computed when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<CascadePlan>,
}

impl DeleteTask {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            plan: None,
        }
    }

    pub fn with_plan(mut self, plan: CascadePlan) -> Self {
        self.plan = Some(plan);
        self
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let mut tx = ctx.begin();
        let plan = match &self.plan {
            Some(plan) if plan.task != self.id => {
                return Err(KolosError::invalid_value(
                    "plan",
                    format!("plan is for {}, not {}", plan.task, self.id),
                ));
            }
            Some(plan) => plan.clone(),
            None => CascadePlan::compute(&tx, &self.id).await?,
        };

        let report = plan.apply(&mut tx).await?;
        tx.commit().await?;

        info!(task = %self.id, removed = report.tasks.len(), "task deleted");
        report_json(&report)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for DeleteTask {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        ids_at(result, &["/tasks", "/comments"])
    }
}

/// Delete several tasks in one outer transaction.
///
/// Tasks are processed in order. A failure on any of them aborts the whole
/// batch. Ids already removed by an earlier cascade in the same batch (a
/// subtask listed after its parent) are skipped.
#[operation(verb = "delete", noun = "tasks", description = "Delete several tasks atomically")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTasks {
    pub ids: Vec<TaskId>,
}

impl DeleteTasks {
    pub fn new<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let mut tx = ctx.begin();
        let mut removed = Removed::default();
        let mut total = CascadeReport::default();

        for id in &self.ids {
            if removed.contains(id) {
                continue;
            }
            let plan = CascadePlan::compute(&tx, id).await?;
            let report = plan.apply(&mut tx).await?;
            removed.record(&report);
            total.tasks.extend(report.tasks);
            total.comments.extend(report.comments);
            total.links.extend(report.links);
        }

        tx.commit().await?;
        info!(requested = self.ids.len(), removed = total.tasks.len(), "tasks deleted");
        report_json(&total)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for DeleteTasks {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        ids_at(result, &["/tasks", "/comments"])
    }
}
