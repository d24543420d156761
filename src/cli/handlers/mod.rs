//! CLI command handlers
//!
//! - pipeline: collect, score, index and the combined run
//! - assistant: terminal chat and the HTTP server
//! - info: configuration and collection statistics

pub mod assistant;
pub mod info;
pub mod pipeline;

pub use assistant::*;
pub use info::*;
pub use pipeline::*;
