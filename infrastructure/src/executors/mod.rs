//! Work executor adapters

pub mod command;

pub use command::{CommandExecutor, CommandSpec};
