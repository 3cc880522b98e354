//! CreateTeam command

use crate::board::seed_columns;
use crate::context::KolosContext;
use crate::defaults::TODO_COLUMN;
use crate::error::{non_empty, KolosError, Result};
use crate::processor::ids_at;
use crate::types::{Board, Comment, Task, Team, UserId};
use kolos_operations::{async_trait, operation, Execute, ExecutionResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::info;

/// Create a team together with its first board.
///
/// The board gets the four reserved columns and one seed task in TODO,
/// authored by the admin and carrying one seed comment. Names and seed text
/// come from the `defaults` config section.
#[operation(
    verb = "create",
    noun = "team",
    description = "Create a team with its default board, columns and seed task"
)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeam {
    pub name: String,
    /// Becomes the team's first admin
    pub admin: UserId,
    /// Theme color; the configured default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl CreateTeam {
    pub fn new(name: impl Into<String>, admin: impl Into<UserId>) -> Self {
        Self {
            name: name.into(),
            admin: admin.into(),
            theme: None,
        }
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    async fn run(&self, ctx: &KolosContext) -> Result<Value> {
        let name = non_empty("name", &self.name)?;
        let defaults = &ctx.config().defaults;

        let mut tx = ctx.begin();
        let admin = ctx.resolve_user(&tx, &self.admin).await?;

        let theme = self.theme.clone().unwrap_or_else(|| defaults.theme.clone());
        let mut team = Team::new(name, admin.clone(), theme);
        let mut board = Board::new(defaults.board_name.clone(), team.id.clone());
        let columns = seed_columns(&board.id);
        board.columns = columns.iter().map(|c| c.id.clone()).collect();

        let todo = columns
            .iter()
            .find(|c| c.name == TODO_COLUMN)
            .ok_or_else(|| KolosError::not_found("column", TODO_COLUMN))?;

        let mut task = Task::new(
            defaults.seed_task.clone(),
            admin.clone(),
            team.id.clone(),
            board.id.clone(),
            todo.id.clone(),
        );
        let comment = Comment::new(defaults.seed_comment.clone(), admin, task.id.clone());
        task.comments.push(comment.id.clone());

        board.push_task(task.id.clone());
        team.boards.push(board.id.clone());
        team.index_task(task.id.clone());

        let value = serde_json::json!({
            "team": team,
            "board": board,
            "columns": columns,
            "task": task,
            "comment": comment,
        });

        for column in columns {
            tx.save(column);
        }
        tx.save(comment);
        tx.save(task);
        tx.save(board);
        tx.save(team);
        tx.commit().await?;

        info!(team = %value["team"]["id"], name = %value["team"]["name"], "team created");
        Ok(value)
    }
}

#[async_trait]
impl Execute<KolosContext, KolosError> for CreateTeam {
    async fn execute(&self, ctx: &KolosContext) -> ExecutionResult<Value, KolosError> {
        let started = Instant::now();
        let input = serde_json::to_value(self).unwrap_or(Value::Null);
        ExecutionResult::mutation(self, input, self.run(ctx).await, started)
    }

    fn affected_resource_ids(&self, result: &Value) -> Vec<String> {
        ids_at(result, &["/team/id", "/board/id", "/task/id"])
    }
}
