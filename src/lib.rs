//! trellolite - local kanban board manager
//!
//! A single-user board manager (boards → lists → tasks) whose whole state is
//! one [`model::AppState`] value owned by a [`store::Store`]. Every mutation
//! replaces the state and writes it through to storage; startup hydrates it
//! again, falling back to a seed dataset.
//!
//! # Module Organization
//!
//! - `model`: Board, List, Task, ChatMessage and the AppState aggregate
//! - `chat`: bounded chat history
//! - `seed`: fallback dataset
//! - `ordering`: position assignment and sibling ordering
//! - `store`: the state store and its mutation protocol
//! - `storage`: persistence backends (JSON file, in-memory)
//! - `lock`: file locking and atomic writes for the state file
//! - `assistant`: bridge between the store and an external assistant
//! - `integrations`: concrete assistant implementations
//! - `config`: configuration loading from `trellolite.toml`
//! - `error`: error types and result aliases
//! - `output`: human / JSON output for the CLI
//! - `cli`: command-line interface using clap

pub mod assistant;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod integrations;
pub mod lock;
pub mod model;
pub mod ordering;
pub mod output;
pub mod seed;
pub mod storage;
pub mod store;

pub use error::{Error, Result};
pub use store::Store;
