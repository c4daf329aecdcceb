//! CLI definition for the `taskboard` command

use clap::{Args, Parser, Subcommand};
use taskboard_client::api::StatisticsKind;
use taskboard_client::types::{TaskPriority, TaskStatus};

/// Taskboard - manage Kanban boards and tasks from the terminal.
///
/// Every command prints the operation outcome as JSON. State fetched from
/// the server is cached in a local snapshot between runs.
#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(version)]
#[command(about = "Manage Taskboard boards, columns and tasks")]
#[command(
    long_about = "Manage Taskboard boards, columns and tasks.\n\n\
    Configuration is read from taskboard.{toml,yaml,json} in the current directory, \
    the user config directory, and TASKBOARD_* environment variables.\n\n\
    Environment variables:\n  \
    TASKBOARD_API__BASE_URL  Override the API base URL\n  \
    TASKBOARD_AUTH__TOKEN    Provide a bearer token\n  \
    RUST_LOG                 Override the log filter"
)]
pub struct Cli {
    /// API base URL, overriding configuration
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Bearer token, overriding configuration
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Info-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Work with boards
    Boards {
        #[command(subcommand)]
        action: BoardAction,
    },

    /// Work with a board's columns
    Columns {
        #[command(subcommand)]
        action: ColumnAction,
    },

    /// Work with tasks
    Tasks {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Show an aggregate statistics report
    Stats {
        /// user, boards, tasks, activity, performance, time, teams or projects
        #[arg(value_parser = parse_statistics_kind)]
        kind: StatisticsKind,
    },
}

#[derive(Subcommand, Debug)]
pub enum BoardAction {
    /// List every board
    List,

    /// Show one board as displayed, overdue tasks included, and make it current
    Show { id: String },

    /// Create a board
    Create {
        title: String,
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a board
    Delete {
        id: String,
        /// The board's exact title
        #[arg(long, value_name = "TITLE")]
        confirm: String,
        /// Required when this is your only board
        #[arg(long)]
        last: bool,
    },

    /// Toggle the favorite flag
    Favorite { id: String },

    /// Show a board's statistics
    Stats { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ColumnAction {
    /// Add a column to a board
    Add { board_id: String, title: String },

    /// Rename a column
    Rename {
        board_id: String,
        column_id: String,
        title: String,
    },

    /// Delete an empty column
    Delete { board_id: String, column_id: String },
}

impl ColumnAction {
    pub fn board_id(&self) -> &str {
        match self {
            Self::Add { board_id, .. }
            | Self::Rename { board_id, .. }
            | Self::Delete { board_id, .. } => board_id,
        }
    }
}

#[derive(Args, Debug)]
pub struct TaskListArgs {
    /// Load one board's tasks into the local cache
    #[arg(long, value_name = "BOARD_ID")]
    pub board: Option<String>,

    /// Bypass the per-board cache
    #[arg(long, requires = "board")]
    pub reload: bool,

    #[arg(long, value_parser = parse_status)]
    pub status: Option<TaskStatus>,

    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TaskAction {
    /// List tasks, for one board or filtered across boards
    List(TaskListArgs),

    /// Add a task to a column
    Add {
        board_id: String,
        column_id: String,
        title: String,
        #[arg(long, value_parser = parse_priority)]
        priority: Option<TaskPriority>,
    },

    /// Move a task to another column
    Move {
        task_id: String,
        from: String,
        to: String,
        #[arg(value_parser = parse_status)]
        status: TaskStatus,
        /// Position in the destination column
        #[arg(long)]
        order: Option<u32>,
    },

    /// Change a task's status
    Status {
        task_id: String,
        #[arg(value_parser = parse_status)]
        status: TaskStatus,
    },

    /// Delete a task
    Delete { task_id: String },

    /// Comment on a task
    Comment { task_id: String, content: String },
}

fn parse_status(s: &str) -> Result<TaskStatus, String> {
    TaskStatus::parse(s).ok_or_else(|| format!("unknown status '{s}'"))
}

fn parse_priority(s: &str) -> Result<TaskPriority, String> {
    TaskPriority::parse(s).ok_or_else(|| format!("unknown priority '{s}'"))
}

fn parse_statistics_kind(s: &str) -> Result<StatisticsKind, String> {
    s.parse()
}
