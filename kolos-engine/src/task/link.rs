//! LinkTasks command
//!
//! Links are edges `from -> to` in their own table. `linked_tasks` of a task
//! are the targets of its outgoing edges and `tasks_linked_to_this` are the
//! sources of its incoming ones, so both views always agree.

use super::task_json;
use crate::context::KolosContext;
use crate::error::{KolosError, Result};
use crate::types::{LinkEdge, Task, TaskId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkOp {
    Add,
    Remove,
}

/// Add or remove links from one task to others, atomically
#[operation(verb = "link", noun = "task", description = "Link or unlink tasks")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkTasks {
    pub id: TaskId,
    pub others: Vec<TaskId>,
    pub op: LinkOp,
}

impl LinkTasks {
    pub fn new<I, T>(id: impl Into<TaskId>, others: I, op: LinkOp) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        Self {
            id: id.into(),
            others: others.into_iter().map(Into::into).collect(),
            op,
        }
    }

    pub fn add<I, T>(id: impl Into<TaskId>, others: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        Self::new(id, others, LinkOp::Add)
    }

    pub fn remove<I, T>(id: impl Into<TaskId>, others: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        Self::new(id, others, LinkOp::Remove)
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let mut tx = ctx.begin();
        let mut task: Task = tx.load(&self.id).await?;

        let mut others = Vec::with_capacity(self.others.len());
        for other in &self.others {
            if other == &self.id {
                return Err(KolosError::invalid_value("others", "a task cannot link to itself"));
            }
            others.push(tx.load::<Task>(other).await?);
        }

        let mut changed = false;
        for mut other in others {
            let edge = LinkEdge::new(self.id.clone(), other.id.clone());
            let present = tx.exists::<LinkEdge>(&edge).await?;
            match self.op {
                LinkOp::Add if !present => tx.save(edge),
                LinkOp::Remove if present => tx.remove::<LinkEdge>(&edge),
                _ => continue,
            }
            other.touch();
            tx.save(other);
            changed = true;
        }

        if changed {
            task.touch();
            tx.save(task.clone());
        }

        let value = task_json(&tx, &task).await?;
        tx.commit().await?;
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for LinkTasks {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, _result: &Value) -> Vec<String> {
        std::iter::once(&self.id)
            .chain(&self.others)
            .map(|id| id.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::fixtures::{seeded, Seeded};
    use crate::task::{AddTask, GetTask};

    async fn add(s: &Seeded, description: &str) -> TaskId {
        let value = AddTask::new(s.board.clone(), s.todo(), "ada", description)
            .execute(&s.ctx)
            .await
            .into_result()
            .unwrap();
        TaskId::from_string(value["id"].as_str().unwrap())
    }

    async fn get(s: &Seeded, id: &TaskId) -> Value {
        GetTask::new(id.clone())
            .execute(&s.ctx)
            .await
            .into_result()
            .unwrap()
    }

    #[tokio::test]
    async fn test_link_is_mirrored() {
        let s = seeded().await;
        let a = add(&s, "A").await;
        let b = add(&s, "B").await;

        LinkTasks::add(a.clone(), [b.clone()])
            .execute(&s.ctx)
            .await
            .into_result()
            .unwrap();

        let a_view = get(&s, &a).await;
        let b_view = get(&s, &b).await;
        assert_eq!(a_view["linked_tasks"], serde_json::json!([b.as_str()]));
        assert_eq!(b_view["tasks_linked_to_this"], serde_json::json!([a.as_str()]));
        assert_eq!(b_view["linked_tasks"], serde_json::json!([]));

        LinkTasks::remove(a.clone(), [b.clone()])
            .execute(&s.ctx)
            .await
            .into_result()
            .unwrap();

        let a_view = get(&s, &a).await;
        let b_view = get(&s, &b).await;
        assert_eq!(a_view["linked_tasks"], serde_json::json!([]));
        assert_eq!(b_view["tasks_linked_to_this"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_add_has_set_semantics() {
        let s = seeded().await;
        let a = add(&s, "A").await;
        let b = add(&s, "B").await;

        for _ in 0..2 {
            LinkTasks::add(a.clone(), [b.clone(), b.clone()])
                .execute(&s.ctx)
                .await
                .into_result()
                .unwrap();
        }
        let a_view = get(&s, &a).await;
        assert_eq!(a_view["linked_tasks"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_link_is_atomic_per_call() {
        let s = seeded().await;
        let a = add(&s, "A").await;
        let b = add(&s, "B").await;
        let commits = s.store.commit_count();

        let result = LinkTasks::add(a.clone(), [b.clone(), TaskId::from_string("ghost")])
            .execute(&s.ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KolosError::NotFound { .. })));
        assert_eq!(s.store.commit_count(), commits);
        assert_eq!(get(&s, &b).await["tasks_linked_to_this"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_self_link_rejected() {
        let s = seeded().await;
        let a = add(&s, "A").await;
        let result = LinkTasks::add(a.clone(), [a.clone()])
            .execute(&s.ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KolosError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_no_link() {
        let s = seeded().await;
        let a = add(&s, "A").await;
        let b = add(&s, "B").await;

        s.store.fail_next_commit();
        let result = LinkTasks::add(a.clone(), [b.clone()])
            .execute(&s.ctx)
            .await
            .into_result();
        assert!(matches!(result, Err(KolosError::Unavailable { .. })));
        assert_eq!(get(&s, &a).await["linked_tasks"], serde_json::json!([]));
    }
}
