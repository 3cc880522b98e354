//! CLI definition for the Kolos command-line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Kolos - team task boards from the command line.
///
/// Every command prints its result as JSON on stdout. Logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "kolos")]
#[command(version)]
#[command(about = "Team task boards: teams, columns, tasks, links and activity")]
#[command(
    long_about = "Kolos manages team task boards stored under a local directory.\n\n\
    Configuration is read from kolos.toml or kolos.yaml in the working directory,\n\
    then from KOLOS_* environment variables (KOLOS_STORAGE__ROOT=/tmp/boards)."
)]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "debug")]
    pub quiet: bool,

    /// Explicit config file instead of the working directory's kolos.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Attribute changes to this user in the activity log
    #[arg(long, global = true, value_name = "USER_ID")]
    pub actor: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage teams
    Team {
        #[command(subcommand)]
        action: TeamAction,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Inspect boards
    Board {
        #[command(subcommand)]
        action: BoardAction,
    },

    /// Manage columns
    Column {
        #[command(subcommand)]
        action: ColumnAction,
    },

    /// Manage tasks
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Show recent changes, newest first
    Activity {
        /// Maximum number of entries
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum TeamAction {
    /// Create a team with its default board
    Create {
        name: String,
        /// User id of the first admin
        #[arg(long)]
        admin: String,
        /// Theme color (hex)
        #[arg(long)]
        theme: Option<String>,
    },
    /// Show a team with its boards and members
    Show { id: String },
}

#[derive(Subcommand, Debug)]
pub enum UserAction {
    /// Register a user
    Add {
        name: String,
        #[arg(long)]
        email: Option<String>,
        /// Use this id instead of a generated one
        #[arg(long)]
        id: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum BoardAction {
    /// Print the assembled board
    Show { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ColumnAction {
    /// Add a custom column to a board
    Add {
        board: String,
        name: String,
        /// Six-digit hex color; derived from the name when absent
        #[arg(long)]
        color: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// Add a task to a column
    Add {
        board: String,
        column: String,
        description: String,
        /// Author user id
        #[arg(long)]
        author: String,
        #[arg(long = "assign", value_name = "USER_ID")]
        assignees: Vec<String>,
        #[arg(long = "label")]
        labels: Vec<String>,
    },
    /// Show one task
    Get { id: String },
    /// Move a task to another column on its board
    Move { id: String, column: String },
    /// Link a task to others
    Link {
        id: String,
        #[arg(required = true)]
        others: Vec<String>,
    },
    /// Remove links from a task to others
    Unlink {
        id: String,
        #[arg(required = true)]
        others: Vec<String>,
    },
    /// Replace a task's assignees
    Assign { id: String, users: Vec<String> },
    /// Delete tasks with their subtasks, comments and links
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}
