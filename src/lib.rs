//! Customer review pipeline: collect reviews, blend text sentiment with star
//! ratings, index the results as vectors and answer questions over them.

pub mod api;
pub mod cli;
pub mod collector;
pub mod config;
pub mod dataset;
pub mod embeddings;
pub mod errors;
pub mod indexer;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;
pub mod sentiment;
pub mod store;

#[cfg(test)]
mod errors_tests;
#[cfg(test)]
pub mod tests;

pub use config::AppConfig;
pub use errors::*;
