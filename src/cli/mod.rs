//! CLI module for the `reviewrag` binary
//!
//! - Command line argument parsing
//! - Command handlers, one file per group of stages
//! - Output formatting

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::*;
pub use handlers::*;
pub use output::*;
