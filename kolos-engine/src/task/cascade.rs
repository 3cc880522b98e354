//! Cascading delete
//!
//! Deleting a task removes, inside the caller's transaction:
//!
//! 1. the comments it owns
//! 2. its slot in its board's and team's task lists
//! 3. its subtasks, each with their own comments, list slots and links
//! 4. every link edge touching it, which clears it from the views of every
//!    task it was linked with
//! 5. its id from its parent's `sub_tasks`, when it is a subtask
//! 6. the task itself
//!
//! A plan handed in by the caller is merged with the comments and subtasks
//! the task holds when the cascade runs, so a partial plan never orphans
//! anything. Nothing is written until the transaction commits, so a failure
//! anywhere leaves the store untouched.

use crate::error::{KolosError, Result};
use crate::store::Transaction;
use crate::types::{Board, Comment, CommentId, LinkEdge, Task, TaskId, Team};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// The dependents of a task, gathered before anything is removed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CascadePlan {
    pub task: TaskId,
    /// Comments owned by the task
    pub comments: Vec<CommentId>,
    /// Subtasks owned by the task
    pub sub_tasks: Vec<TaskId>,
    /// Tasks linking to this one
    pub linked_by: Vec<TaskId>,
}

/// What a cascade removed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    pub tasks: Vec<TaskId>,
    pub comments: Vec<CommentId>,
    pub links: Vec<LinkEdge>,
}

impl CascadeReport {
    fn merge(&mut self, other: CascadeReport) {
        self.tasks.extend(other.tasks);
        self.comments.extend(other.comments);
        self.links.extend(other.links);
    }
}

impl CascadePlan {
    /// Gather the dependents of `task` as the transaction sees them
    pub async fn compute(tx: &Transaction<'_>, task: &TaskId) -> Result<Self> {
        let loaded: Task = tx.load(task).await?;
        Ok(Self {
            task: loaded.id.clone(),
            comments: loaded.comments.clone(),
            sub_tasks: loaded.sub_tasks().to_vec(),
            linked_by: tx.links_to(task).await?,
        })
    }

    /// Stage every removal into `tx`
    pub async fn apply(&self, tx: &mut Transaction<'_>) -> Result<CascadeReport> {
        let task: Task = tx.load(&self.task).await?;
        let mut report = CascadeReport::default();

        // A caller's plan may be stale or partial; what the task owns now is
        // removed too.
        let comments = union(&self.comments, &task.comments);
        let sub_tasks = union(&self.sub_tasks, task.sub_tasks());

        // 1. owned comments
        remove_comments(tx, &comments, &mut report);

        // 2. board and team list slots
        unlist(tx, &task).await?;

        // 3. owned subtasks, outright
        for sub_id in &sub_tasks {
            let Some(sub) = tx.find::<Task>(sub_id).await? else {
                continue;
            };
            if sub.parent_id() != Some(&task.id) {
                return Err(KolosError::invalid_hierarchy(format!(
                    "{} is not a subtask of {}",
                    sub.id, task.id
                )));
            }
            report.merge(remove_leaf(tx, &sub).await?);
        }

        // 4. links in both directions
        for other in &self.linked_by {
            let edge = LinkEdge::new(other.clone(), task.id.clone());
            tx.remove::<LinkEdge>(&edge);
            report.links.push(edge);
        }
        for edge in tx.edges_touching(&task.id).await? {
            tx.remove::<LinkEdge>(&edge);
            report.links.push(edge);
        }

        // 5. parent's subtask list
        if let Some(parent_id) = task.parent_id() {
            if let Some(mut parent) = tx.find::<Task>(parent_id).await? {
                if let Some(sub_tasks) = parent.sub_tasks_mut() {
                    sub_tasks.retain(|id| id != &task.id);
                }
                parent.touch();
                tx.save(parent);
            }
        }

        // 6. the task
        tx.remove::<Task>(&task.id);
        report.tasks.insert(0, task.id.clone());

        report.links.sort();
        report.links.dedup();
        debug!(
            task = %task.id,
            tasks = report.tasks.len(),
            comments = report.comments.len(),
            links = report.links.len(),
            "cascade staged"
        );
        Ok(report)
    }
}

/// `planned` followed by whatever in `current` it is missing
fn union<T: Clone + PartialEq>(planned: &[T], current: &[T]) -> Vec<T> {
    let mut all = Vec::with_capacity(planned.len() + current.len());
    for id in planned.iter().chain(current) {
        if !all.contains(id) {
            all.push(id.clone());
        }
    }
    all
}

fn remove_comments(tx: &mut Transaction<'_>, comments: &[CommentId], report: &mut CascadeReport) {
    for id in comments {
        tx.remove::<Comment>(id);
        report.comments.push(id.clone());
    }
}

/// Take a task out of its board's and team's task lists
async fn unlist(tx: &mut Transaction<'_>, task: &Task) -> Result<()> {
    if let Some(board_id) = &task.board {
        if let Some(mut board) = tx.find::<Board>(board_id).await? {
            if board.remove_task(&task.id) {
                tx.save(board);
            }
        }
    }
    if let Some(mut team) = tx.find::<Team>(&task.team).await? {
        if team.remove_task(&task.id) {
            tx.save(team);
        }
    }
    Ok(())
}

/// Remove a subtask whose parent is being deleted too
async fn remove_leaf(tx: &mut Transaction<'_>, sub: &Task) -> Result<CascadeReport> {
    let mut report = CascadeReport::default();
    remove_comments(tx, &sub.comments, &mut report);
    unlist(tx, sub).await?;
    for edge in tx.edges_touching(&sub.id).await? {
        tx.remove::<LinkEdge>(&edge);
        report.links.push(edge);
    }
    tx.remove::<Task>(&sub.id);
    report.tasks.push(sub.id.clone());
    Ok(report)
}

/// Ids removed so far in a batch, so overlapping cascades are skipped
#[derive(Debug, Default)]
pub(super) struct Removed(BTreeSet<TaskId>);

impl Removed {
    pub fn contains(&self, id: &TaskId) -> bool {
        self.0.contains(id)
    }

    pub fn record(&mut self, report: &CascadeReport) {
        self.0.extend(report.tasks.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::{ColumnId, UserId};

    struct World {
        store: MemoryStore,
        team: Team,
        board: Board,
        parent: Task,
        sub: Task,
        other: Task,
        comment: Comment,
        sub_comment: Comment,
    }

    fn world() -> World {
        let author = UserId::from_string("ada");
        let mut team = Team::new("Core", author.clone(), "5319e7");
        let mut board = Board::new("Kolos 1", team.id.clone());
        let column = ColumnId::from_string("todo");

        let mut parent = Task::new(
            "Parent",
            author.clone(),
            team.id.clone(),
            board.id.clone(),
            column.clone(),
        );
        let mut sub = Task::subtask_of(&parent, "Sub", author.clone());
        let other = Task::new("Other", author.clone(), team.id.clone(), board.id.clone(), column);
        if let Some(subs) = parent.sub_tasks_mut() {
            subs.push(sub.id.clone());
        }

        let comment = Comment::new("on parent", author.clone(), parent.id.clone());
        let sub_comment = Comment::new("on sub", author, sub.id.clone());
        parent.comments.push(comment.id.clone());
        sub.comments.push(sub_comment.id.clone());

        for id in [&parent.id, &sub.id, &other.id] {
            board.push_task(id.clone());
            team.index_task(id.clone());
        }
        team.boards.push(board.id.clone());

        World {
            store: MemoryStore::new(),
            team,
            board,
            parent,
            sub,
            other,
            comment,
            sub_comment,
        }
    }

    async fn persist(w: &World) {
        let mut tx = Transaction::new(&w.store);
        tx.save(w.team.clone());
        tx.save(w.board.clone());
        tx.save(w.parent.clone());
        tx.save(w.sub.clone());
        tx.save(w.other.clone());
        tx.save(w.comment.clone());
        tx.save(w.sub_comment.clone());
        tx.save(LinkEdge::new(w.other.id.clone(), w.parent.id.clone()));
        tx.save(LinkEdge::new(w.parent.id.clone(), w.other.id.clone()));
        tx.save(LinkEdge::new(w.sub.id.clone(), w.other.id.clone()));
        tx.commit().await.unwrap();
    }

    #[tokio::test]
    async fn test_compute_plan() {
        let w = world();
        persist(&w).await;

        let tx = Transaction::new(&w.store);
        let plan = CascadePlan::compute(&tx, &w.parent.id).await.unwrap();
        assert_eq!(plan.comments, vec![w.comment.id.clone()]);
        assert_eq!(plan.sub_tasks, vec![w.sub.id.clone()]);
        assert_eq!(plan.linked_by, vec![w.other.id.clone()]);
    }

    #[tokio::test]
    async fn test_cascade_removes_everything() {
        let w = world();
        persist(&w).await;

        let mut tx = Transaction::new(&w.store);
        let plan = CascadePlan::compute(&tx, &w.parent.id).await.unwrap();
        let report = plan.apply(&mut tx).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(report.tasks, vec![w.parent.id.clone(), w.sub.id.clone()]);
        assert_eq!(report.comments.len(), 2);
        assert_eq!(report.links.len(), 3);

        let tx = Transaction::new(&w.store);
        assert!(!tx.exists::<Task>(&w.parent.id).await.unwrap());
        assert!(!tx.exists::<Task>(&w.sub.id).await.unwrap());
        assert!(!tx.exists::<Comment>(&w.comment.id).await.unwrap());
        assert!(!tx.exists::<Comment>(&w.sub_comment.id).await.unwrap());
        assert!(tx.list::<LinkEdge>().await.unwrap().is_empty());

        let board: Board = tx.load(&w.board.id).await.unwrap();
        assert_eq!(board.tasks, vec![w.other.id.clone()]);
        let team: Team = tx.load(&w.team.id).await.unwrap();
        assert_eq!(team.tasks, vec![w.other.id.clone()]);
        assert!(tx.links_from(&w.other.id).await.unwrap().is_empty());
        assert!(tx.links_to(&w.other.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_deleting_subtask_updates_parent() {
        let w = world();
        persist(&w).await;

        let mut tx = Transaction::new(&w.store);
        let plan = CascadePlan::compute(&tx, &w.sub.id).await.unwrap();
        assert!(plan.sub_tasks.is_empty());
        plan.apply(&mut tx).await.unwrap();
        tx.commit().await.unwrap();

        let tx = Transaction::new(&w.store);
        let parent: Task = tx.load(&w.parent.id).await.unwrap();
        assert!(parent.sub_tasks().is_empty());
        assert!(!tx.exists::<Comment>(&w.sub_comment.id).await.unwrap());
        // The parent's own link survives
        assert_eq!(tx.links_from(&w.parent.id).await.unwrap(), vec![w.other.id.clone()]);
    }

    #[tokio::test]
    async fn test_failed_commit_removes_nothing() {
        let w = world();
        persist(&w).await;
        let before = w.store.len().await;

        let mut tx = Transaction::new(&w.store);
        let plan = CascadePlan::compute(&tx, &w.parent.id).await.unwrap();
        plan.apply(&mut tx).await.unwrap();
        w.store.fail_next_commit();
        assert!(matches!(tx.commit().await, Err(KolosError::Unavailable { .. })));

        assert_eq!(w.store.len().await, before);
        let tx = Transaction::new(&w.store);
        assert!(tx.exists::<Task>(&w.parent.id).await.unwrap());
        assert_eq!(tx.links_to(&w.parent.id).await.unwrap(), vec![w.other.id.clone()]);
    }

    #[tokio::test]
    async fn test_foreign_subtask_in_plan_rejected() {
        let w = world();
        persist(&w).await;

        let mut tx = Transaction::new(&w.store);
        let plan = CascadePlan {
            task: w.parent.id.clone(),
            sub_tasks: vec![w.other.id.clone()],
            ..Default::default()
        };
        let result = plan.apply(&mut tx).await;
        assert!(matches!(result, Err(KolosError::InvalidHierarchy { .. })));
    }

    #[tokio::test]
    async fn test_partial_plan_still_removes_owned_records() {
        let w = world();
        persist(&w).await;

        let mut tx = Transaction::new(&w.store);
        let plan = CascadePlan {
            task: w.parent.id.clone(),
            ..Default::default()
        };
        let report = plan.apply(&mut tx).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(report.tasks, vec![w.parent.id.clone(), w.sub.id.clone()]);
        assert_eq!(report.comments.len(), 2);

        let tx = Transaction::new(&w.store);
        assert!(!tx.exists::<Task>(&w.sub.id).await.unwrap());
        assert!(!tx.exists::<Comment>(&w.comment.id).await.unwrap());
        assert!(!tx.exists::<Comment>(&w.sub_comment.id).await.unwrap());
        assert!(tx.links_from(&w.sub.id).await.unwrap().is_empty());
        let board: Board = tx.load(&w.board.id).await.unwrap();
        assert_eq!(board.tasks, vec![w.other.id.clone()]);
    }

    #[test]
    fn test_union_keeps_order_without_repeats() {
        let planned = [TaskId::from_string("a"), TaskId::from_string("b")];
        let current = [TaskId::from_string("b"), TaskId::from_string("c")];
        let ids: Vec<_> = union(&planned, &current)
            .into_iter()
            .map(|id| id.to_string())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn test_removed_tracking() {
        let mut removed = Removed::default();
        let report = CascadeReport {
            tasks: vec![TaskId::from_string("a"), TaskId::from_string("b")],
            ..Default::default()
        };
        removed.record(&report);
        assert!(removed.contains(&TaskId::from_string("b")));
        assert!(!removed.contains(&TaskId::from_string("c")));
    }
}
