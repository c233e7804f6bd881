//! Command-line interface for trellolite
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command family is implemented in its own submodule; none of them
//! touch the state directly, they only call the [`Store`] and the
//! assistant bridge.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::storage::Storage;
use crate::store::Store;

mod board;
mod chat;
mod list;
mod task;

/// trellolite - local kanban boards
///
/// Boards hold lists, lists hold tasks. State lives in one JSON file in the
/// data directory; an optional assistant can create tasks from chat.
#[derive(Parser, Debug)]
#[command(name = "trellolite")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding trellolite_data.json and trellolite.toml
    #[arg(long, global = true, env = "TRELLOLITE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Board management
    #[command(subcommand)]
    Board(BoardCommands),

    /// List (column) management
    #[command(subcommand)]
    List(ListCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Talk to the assistant
    #[command(subcommand)]
    Chat(ChatCommands),

    /// Leave the active board and return to the board overview
    Home,
}

/// Board subcommands
#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// Create a board with To Do / In Progress / Done lists
    New {
        /// Board title
        title: String,

        /// Board description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// List boards
    Ls,

    /// Show a board's lists and tasks (defaults to the active board)
    Show {
        /// Board id
        id: Option<String>,
    },

    /// Make a board the active one
    Open {
        /// Board id
        id: String,
    },

    /// Change a board's title or description
    Edit {
        /// Board id
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a board with all its lists and tasks
    Rm {
        /// Board id
        id: String,
    },
}

/// List subcommands
#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// Append a list to a board
    New {
        /// Board id
        board: String,

        /// List title
        title: String,
    },

    /// Delete a list and its tasks
    Rm {
        /// List id
        id: String,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Append a task to a list
    New {
        /// List id
        list: String,

        /// Task title
        title: String,

        /// Task description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Change a task's title or description
    Edit {
        /// Task id
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Move a task to another list
    Mv {
        /// Task id
        id: String,

        /// Target list id
        list: String,

        /// Explicit position in the target list (default: keep current value)
        #[arg(long)]
        position: Option<u32>,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: String,
    },
}

/// Chat subcommands
#[derive(Subcommand, Debug)]
pub enum ChatCommands {
    /// Send a message to the assistant
    Send {
        /// Message text
        message: String,
    },

    /// Show the conversation
    Log,

    /// Reset the conversation to the greeting
    Clear,
}

/// Flags shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub data_dir: Option<PathBuf>,
    pub output: OutputOptions,
}

/// A hydrated store plus the configuration it was opened with
pub(crate) struct Session {
    pub config: Config,
    pub store: Store,
}

impl Session {
    pub fn open(global: &GlobalOptions) -> Result<Self> {
        let data_dir = match &global.data_dir {
            Some(dir) => dir.clone(),
            None => Storage::default_data_dir()?,
        };
        let config = Config::load_from_dir(&data_dir)?;
        let storage = Storage::with_state_file(data_dir, config.storage.file.clone());
        storage.init()?;
        tracing::debug!(path = %storage.state_file().display(), "opening store");
        let store = Store::open(storage);
        Ok(Self { config, store })
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let global = GlobalOptions {
            data_dir: self.data_dir,
            output: OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
        };

        match self.command {
            Commands::Home => board::run_home(&global),
            Commands::Board(cmd) => match cmd {
                BoardCommands::New { title, description } => {
                    board::run_new(&global, board::NewOptions { title, description })
                }
                BoardCommands::Ls => board::run_ls(&global),
                BoardCommands::Show { id } => board::run_show(&global, id),
                BoardCommands::Open { id } => board::run_open(&global, id),
                BoardCommands::Edit {
                    id,
                    title,
                    description,
                } => board::run_edit(
                    &global,
                    board::EditOptions {
                        id,
                        title,
                        description,
                    },
                ),
                BoardCommands::Rm { id } => board::run_rm(&global, id),
            },
            Commands::List(cmd) => match cmd {
                ListCommands::New { board, title } => {
                    list::run_new(&global, list::NewOptions { board, title })
                }
                ListCommands::Rm { id } => list::run_rm(&global, id),
            },
            Commands::Task(cmd) => match cmd {
                TaskCommands::New {
                    list,
                    title,
                    description,
                } => task::run_new(
                    &global,
                    task::NewOptions {
                        list,
                        title,
                        description,
                    },
                ),
                TaskCommands::Edit {
                    id,
                    title,
                    description,
                } => task::run_edit(
                    &global,
                    task::EditOptions {
                        id,
                        title,
                        description,
                    },
                ),
                TaskCommands::Mv { id, list, position } => {
                    task::run_mv(&global, task::MoveOptions { id, list, position })
                }
                TaskCommands::Rm { id } => task::run_rm(&global, id),
            },
            Commands::Chat(cmd) => match cmd {
                ChatCommands::Send { message } => chat::run_send(&global, message),
                ChatCommands::Log => chat::run_log(&global),
                ChatCommands::Clear => chat::run_clear(&global),
            },
        }
    }
}
