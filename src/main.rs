use clap::Parser;
use reviewrag::cli::handle_chat;
use reviewrag::cli::handle_collect;
use reviewrag::cli::handle_config;
use reviewrag::cli::handle_index;
use reviewrag::cli::handle_run;
use reviewrag::cli::handle_score;
use reviewrag::cli::handle_serve;
use reviewrag::cli::handle_stats;
use reviewrag::cli::Cli;
use reviewrag::cli::Commands;
use reviewrag::AppConfig;
use reviewrag::Result;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load_from(cli.config.as_deref())?;
    config.validate()?;

    // Initialize logging
    reviewrag::logging::init_logging(&config.logging, cli.verbose)?;
    info!("Configuration loaded successfully");

    match cli.command {
        Commands::Collect { output } => handle_collect(&config, output).await?,
        Commands::Score { input, output } => handle_score(&config, input, output)?,
        Commands::Index { input, reset } => handle_index(&config, input, reset).await?,
        Commands::Chat => handle_chat(&config).await?,
        Commands::Serve { host, port, cors } => handle_serve(&config, host, port, cors).await?,
        Commands::Run { reset } => handle_run(&config, reset).await?,
        Commands::Config => handle_config(&config),
        Commands::Stats => handle_stats(&config).await?,
    }

    Ok(())
}
