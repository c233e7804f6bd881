//! Concrete [`crate::assistant::Assistant`] implementations.

pub mod command;

pub use command::CommandAssistant;
