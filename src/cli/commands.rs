//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "reviewrag")]
#[command(about = "Collect customer reviews, score their sentiment and chat with them")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: configured level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape reviews for every configured category into CSV files
    Collect {
        /// Output directory (default: collector.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Score review CSVs with text sentiment blended with star ratings
    Score {
        /// Directory of review CSVs (default: scorer.input_dir)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output directory (default: scorer.output_dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Embed scored reviews into the vector collection
    Index {
        /// Directory of scored CSVs (default: scorer.output_dir)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Clear the collection before indexing
        #[arg(long)]
        reset: bool,
    },
    /// Chat with the assistant in the terminal
    Chat,
    /// Serve the chat API over HTTP
    Serve {
        /// Host to bind (default: server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (default: server.port)
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable permissive CORS
        #[arg(long)]
        cors: bool,
    },
    /// Collect, score and index in one run
    Run {
        /// Clear the collection before indexing
        #[arg(long)]
        reset: bool,
    },
    /// Show the effective configuration (secrets masked)
    Config,
    /// Show collection statistics
    Stats,
}
