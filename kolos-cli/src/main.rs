//! Kolos CLI
//!
//! Commands:
//! - `kolos team create <name> --admin <user>`: Create a team and its default board
//! - `kolos user add <name>`: Register a user
//! - `kolos board show <id>`: Print an assembled board
//! - `kolos column add <board> <name>`: Add a custom column
//! - `kolos task add|get|move|link|unlink|assign|delete`: Work with tasks
//! - `kolos activity`: Recent changes, newest first
//!
//! Exit codes:
//! - 0: Success
//! - 1: Error

mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{BoardAction, Cli, ColumnAction, Commands, TaskAction, TeamAction, UserAction};
use kolos_engine::{
    board::GetBoard,
    column::AddColumn,
    notify::ActivityLog,
    task::{AddTask, AssignTask, DeleteTask, DeleteTasks, GetTask, LinkTasks, MoveTask},
    team::{CreateTeam, GetTeam},
    user::AddUser,
    KolosConfig, KolosContext, KolosOperationProcessor,
};
use serde_json::Value;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Activity log file inside the storage root
const ACTIVITY_FILE: &str = "activity.jsonl";

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    };
    configure_logging(&cli, &config);

    match run(cli, config).await {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<KolosConfig> {
    let config = match &cli.config {
        Some(path) => KolosConfig::load_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => KolosConfig::load().context("loading configuration")?,
    };
    Ok(config)
}

/// `RUST_LOG` wins, then `--debug`/`--quiet`, then `log.level` from config
fn configure_logging(cli: &Cli, config: &KolosConfig) {
    let level = if cli.quiet {
        "error"
    } else if cli.debug {
        "debug"
    } else {
        config.log.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("kolos_engine={level},kolos={level},warn")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli, config: KolosConfig) -> anyhow::Result<Value> {
    let activity = Arc::new(ActivityLog::new(config.storage.root.join(ACTIVITY_FILE)));
    let ctx = KolosContext::open(config)
        .await
        .context("opening store")?
        .with_events(activity.clone());
    let processor = match cli.actor {
        Some(actor) => KolosOperationProcessor::new().with_actor(actor),
        None => KolosOperationProcessor::new(),
    };

    let value = match cli.command {
        Commands::Team { action } => match action {
            TeamAction::Create { name, admin, theme } => {
                let mut op = CreateTeam::new(name, admin);
                if let Some(theme) = theme {
                    op = op.with_theme(theme);
                }
                processor.process(&op, &ctx).await?
            }
            TeamAction::Show { id } => processor.process(&GetTeam::new(id), &ctx).await?,
        },

        Commands::User { action } => match action {
            UserAction::Add { name, email, id } => {
                let mut op = AddUser::new(name);
                if let Some(email) = email {
                    op = op.with_email(email);
                }
                if let Some(id) = id {
                    op = op.with_id(id);
                }
                processor.process(&op, &ctx).await?
            }
        },

        Commands::Board { action } => match action {
            BoardAction::Show { id } => processor.process(&GetBoard::new(id), &ctx).await?,
        },

        Commands::Column { action } => match action {
            ColumnAction::Add { board, name, color } => {
                let mut op = AddColumn::new(board, name);
                if let Some(color) = color {
                    op = op.with_color(color);
                }
                processor.process(&op, &ctx).await?
            }
        },

        Commands::Task { action } => match action {
            TaskAction::Add {
                board,
                column,
                description,
                author,
                assignees,
                labels,
            } => {
                let op = AddTask::new(board, column, author, description)
                    .with_assignees(assignees)
                    .with_labels(labels);
                processor.process(&op, &ctx).await?
            }
            TaskAction::Get { id } => processor.process(&GetTask::new(id), &ctx).await?,
            TaskAction::Move { id, column } => {
                processor.process(&MoveTask::new(id, column), &ctx).await?
            }
            TaskAction::Link { id, others } => {
                processor.process(&LinkTasks::add(id, others), &ctx).await?
            }
            TaskAction::Unlink { id, others } => {
                processor
                    .process(&LinkTasks::remove(id, others), &ctx)
                    .await?
            }
            TaskAction::Assign { id, users } => {
                processor.process(&AssignTask::new(id, users), &ctx).await?
            }
            TaskAction::Delete { mut ids } => {
                if ids.len() == 1 {
                    let id = ids.remove(0);
                    processor.process(&DeleteTask::new(id), &ctx).await?
                } else {
                    processor.process(&DeleteTasks::new(ids), &ctx).await?
                }
            }
        },

        Commands::Activity { limit } => {
            serde_json::to_value(activity.read(Some(limit)).await?)?
        }
    };

    Ok(value)
}
