//! CLI module - command-line interface
//!
//! Contains the interactive menu and command dispatch.

pub mod commands;
pub mod repl;

pub use commands::{execute, Action, CommandContext};
pub use repl::Menu;
