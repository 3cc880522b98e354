//! Board assembly: the read path
//!
//! Rebuilds a render-ready [`BoardSnapshot`] from stored records. Columns come
//! back in board order with their colors, tasks in the board's canonical order
//! with authors and assignees resolved, subtasks nested under their parents
//! and comments newest first.
//!
//! Subtasks keep a slot in the board's persisted task list but are filtered
//! out of the top level here. References that no longer resolve are skipped
//! with a warning instead of failing the read.

mod view;

pub use view::{BoardSnapshot, ColumnView, CommentView, TaskView, UserView};

use crate::error::Result;
use crate::store::Transaction;
use crate::types::{Board, BoardId, Column, Comment, LinkEdge, Task, TaskId, User, UserId};
use std::collections::HashMap;
use tracing::warn;

/// Hydrates boards from one transaction's view of the store
pub struct BoardAssembler<'t, 's> {
    tx: &'t Transaction<'s>,
    users: HashMap<UserId, User>,
    edges: Vec<LinkEdge>,
}

impl<'t, 's> BoardAssembler<'t, 's> {
    /// Preload the lookups shared by every task on a board
    pub async fn new(tx: &'t Transaction<'s>) -> Result<Self> {
        let users = tx
            .list::<User>()
            .await?
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();
        let edges = tx.list::<LinkEdge>().await?;
        Ok(Self { tx, users, edges })
    }

    /// Assemble one board
    pub async fn assemble(&self, board_id: &BoardId) -> Result<BoardSnapshot> {
        let board: Board = self.tx.load(board_id).await?;

        let mut columns = Vec::with_capacity(board.columns.len());
        for id in &board.columns {
            match self.tx.find::<Column>(id).await? {
                Some(column) => columns.push(ColumnView::from(column)),
                None => warn!(board = %board.id, column = %id, "skipping dangling column"),
            }
        }

        let mut tasks = Vec::new();
        for id in &board.tasks {
            let Some(task) = self.tx.find::<Task>(id).await? else {
                warn!(board = %board.id, task = %id, "skipping dangling task");
                continue;
            };
            if task.is_subtask() {
                continue;
            }

            let mut view = self.task_view(&task).await?;
            for sub_id in task.sub_tasks() {
                match self.tx.find::<Task>(sub_id).await? {
                    Some(sub) => view.sub_tasks.push(self.task_view(&sub).await?),
                    None => warn!(task = %task.id, subtask = %sub_id, "skipping dangling subtask"),
                }
            }
            tasks.push(view);
        }

        Ok(BoardSnapshot {
            team_id: board.team.clone(),
            board,
            columns,
            tasks,
        })
    }

    /// One task without its subtasks
    async fn task_view(&self, task: &Task) -> Result<TaskView> {
        let mut comments = Vec::with_capacity(task.comments.len());
        for id in &task.comments {
            match self.tx.find::<Comment>(id).await? {
                Some(comment) => comments.push(CommentView {
                    author: self.user(&comment.author),
                    id: comment.id,
                    content: comment.content,
                    attachments: comment.attachments,
                    created_at: comment.created_at,
                }),
                None => warn!(task = %task.id, comment = %id, "skipping dangling comment"),
            }
        }
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(TaskView {
            id: task.id.clone(),
            description: task.description.clone(),
            task_type: task.task_type,
            column: task.column.clone(),
            board: task.board.clone(),
            location: task.location,
            parent: task.parent_id().cloned(),
            author: self.user(&task.author),
            assigned_to: task.assigned_to.iter().filter_map(|id| self.user(id)).collect(),
            labels: task.labels.iter().cloned().collect(),
            attachments: task.attachments.clone(),
            comments,
            sub_tasks: Vec::new(),
            linked_tasks: self.links_from(&task.id),
            tasks_linked_to_this: self.links_to(&task.id),
            created_at: task.created_at,
            updated_at: task.updated_at,
        })
    }

    fn user(&self, id: &UserId) -> Option<UserView> {
        match self.users.get(id) {
            Some(user) => Some(UserView::from(user)),
            None => {
                warn!(user = %id, "skipping dangling user");
                None
            }
        }
    }

    fn links_from(&self, id: &TaskId) -> Vec<TaskId> {
        self.edges
            .iter()
            .filter(|edge| &edge.from == id)
            .map(|edge| edge.to.clone())
            .collect()
    }

    fn links_to(&self, id: &TaskId) -> Vec<TaskId> {
        self.edges
            .iter()
            .filter(|edge| &edge.to == id)
            .map(|edge| edge.from.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::KolosContext;
    use crate::types::{Team, UserId};
    use chrono::{Duration, Utc};

    struct Fixture {
        ctx: KolosContext,
        board: BoardId,
        todo: Column,
        done: Column,
    }

    async fn fixture() -> Fixture {
        let ctx = KolosContext::in_memory();
        let ada = User::new("Ada").with_id("ada");
        let team = Team::new("Core", ada.id.clone(), "5319e7");
        let mut board = Board::new("Kolos 1", team.id.clone());
        let todo = Column::new("TODO", board.id.clone());
        let done = Column::new("Done", board.id.clone());
        board.columns = vec![todo.id.clone(), done.id.clone()];

        let mut tx = ctx.begin();
        tx.save(ada);
        tx.save(team);
        tx.save(todo.clone());
        tx.save(done.clone());
        let board_id = board.id.clone();
        tx.save(board);
        tx.commit().await.unwrap();

        Fixture {
            ctx,
            board: board_id,
            todo,
            done,
        }
    }

    fn task(fx: &Fixture, description: &str, column: &Column) -> Task {
        Task::new(
            description,
            UserId::from_string("ada"),
            crate::types::TeamId::from_string("team"),
            fx.board.clone(),
            column.id.clone(),
        )
    }

    #[tokio::test]
    async fn test_columns_in_board_order() {
        let fx = fixture().await;
        let tx = fx.ctx.begin();
        let snapshot = BoardAssembler::new(&tx)
            .await
            .unwrap()
            .assemble(&fx.board)
            .await
            .unwrap();

        let names: Vec<_> = snapshot.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["TODO", "Done"]);
        assert_eq!(snapshot.columns[0].color, fx.todo.color);
        assert!(snapshot.tasks.is_empty());
    }

    #[tokio::test]
    async fn test_subtasks_nested_and_filtered() {
        let fx = fixture().await;
        let mut parent = task(&fx, "Parent", &fx.todo);
        let sub = Task::subtask_of(&parent, "Sub", UserId::from_string("ada"));
        if let Some(subs) = parent.sub_tasks_mut() {
            subs.push(sub.id.clone());
        }

        let mut tx = fx.ctx.begin();
        let mut board: Board = tx.load(&fx.board).await.unwrap();
        board.tasks = vec![parent.id.clone(), sub.id.clone()];
        tx.save(board);
        tx.save(parent.clone());
        tx.save(sub.clone());
        tx.commit().await.unwrap();

        let tx = fx.ctx.begin();
        let snapshot = BoardAssembler::new(&tx)
            .await
            .unwrap()
            .assemble(&fx.board)
            .await
            .unwrap();

        assert_eq!(snapshot.tasks.len(), 1);
        assert_eq!(snapshot.tasks[0].id, parent.id);
        assert_eq!(snapshot.tasks[0].sub_tasks.len(), 1);
        assert_eq!(snapshot.tasks[0].sub_tasks[0].id, sub.id);
        assert_eq!(
            snapshot.tasks[0].sub_tasks[0].author.as_ref().map(|u| u.name.as_str()),
            Some("Ada")
        );
    }

    #[tokio::test]
    async fn test_comments_newest_first_and_dangling_skipped() {
        let fx = fixture().await;
        let mut t = task(&fx, "Commented", &fx.done);
        t.assigned_to.insert(UserId::from_string("ada"));
        t.assigned_to.insert(UserId::from_string("ghost"));

        let mut old = Comment::new("old", UserId::from_string("ada"), t.id.clone());
        old.created_at = Utc::now() - Duration::minutes(5);
        let new = Comment::new("new", UserId::from_string("ghost"), t.id.clone());
        // Stored oldest first on purpose
        t.comments = vec![old.id.clone(), new.id.clone(), "missing".into()];

        let mut tx = fx.ctx.begin();
        let mut board: Board = tx.load(&fx.board).await.unwrap();
        board.tasks = vec![t.id.clone(), "vanished".into()];
        tx.save(board);
        tx.save(t);
        tx.save(old);
        tx.save(new);
        tx.commit().await.unwrap();

        let tx = fx.ctx.begin();
        let snapshot = BoardAssembler::new(&tx)
            .await
            .unwrap()
            .assemble(&fx.board)
            .await
            .unwrap();

        assert_eq!(snapshot.tasks.len(), 1);
        let view = &snapshot.tasks[0];
        assert_eq!(view.assigned_to.len(), 1);
        let contents: Vec<_> = view.comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["new", "old"]);
        assert!(view.comments[0].author.is_none());
        assert_eq!(view.comments[1].author.as_ref().unwrap().name, "Ada");
    }

    #[tokio::test]
    async fn test_link_views() {
        let fx = fixture().await;
        let a = task(&fx, "A", &fx.todo);
        let b = task(&fx, "B", &fx.todo);

        let mut tx = fx.ctx.begin();
        let mut board: Board = tx.load(&fx.board).await.unwrap();
        board.tasks = vec![a.id.clone(), b.id.clone()];
        tx.save(board);
        tx.save(LinkEdge::new(a.id.clone(), b.id.clone()));
        tx.save(a.clone());
        tx.save(b.clone());
        tx.commit().await.unwrap();

        let tx = fx.ctx.begin();
        let snapshot = BoardAssembler::new(&tx)
            .await
            .unwrap()
            .assemble(&fx.board)
            .await
            .unwrap();

        let a_view = snapshot.task(&a.id).unwrap();
        let b_view = snapshot.task(&b.id).unwrap();
        assert_eq!(a_view.linked_tasks, vec![b.id.clone()]);
        assert!(a_view.tasks_linked_to_this.is_empty());
        assert_eq!(b_view.tasks_linked_to_this, vec![a.id.clone()]);
        assert_eq!(snapshot.column_tasks(&fx.todo.id).len(), 2);
        assert!(snapshot.column_tasks(&fx.done.id).is_empty());
    }

    #[tokio::test]
    async fn test_missing_board() {
        let fx = fixture().await;
        let tx = fx.ctx.begin();
        let result = BoardAssembler::new(&tx)
            .await
            .unwrap()
            .assemble(&BoardId::from_string("nope"))
            .await;
        assert!(matches!(result, Err(crate::KolosError::NotFound { .. })));
    }
}
