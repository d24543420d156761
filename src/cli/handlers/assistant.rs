//! Terminal chat and API server handlers

use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

use crate::cli::output::*;
use crate::rag::RagService;
use crate::AppConfig;
use crate::Result;
use crate::ReviewRagError;

const WELCOME: &str = "👋 Hello! I am your Startup Assistant.

Here are a few things I can do for you:
  * Market Research: \"What are the common complaints in this industry?\"
  * Competitor Analysis: \"Which brand has the best weighted score and why?\"
  * Customer Support: \"Draft a polite reply to this angry customer review.\"

Type 'exit' or 'quit' to leave.";

/// Open the assistant, reporting a missing collection to the user
async fn open_assistant(config: &AppConfig) -> Result<RagService> {
    match RagService::new(config).await {
        Ok(service) => Ok(service),
        Err(e @ ReviewRagError::CollectionNotFound(_)) => {
            print_error(&e.to_string());
            Err(e)
        }
        Err(e) => Err(e),
    }
}

pub async fn handle_chat(config: &AppConfig) -> Result<()> {
    print_info("Loading market insights collection...");
    let service = open_assistant(config).await?;
    print_info(&format!(
        "Answering from the {} closest reviews per question",
        service.top_k()
    ));
    println!("{WELCOME}\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt("You> ");
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if matches!(question, "exit" | "quit") {
            break;
        }

        let reply = service.respond(question).await;
        print_reply(&reply);
    }

    println!("👋 Goodbye!");
    Ok(())
}

pub async fn handle_serve(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
    cors: bool,
) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let cors = cors || config.server.cors;

    println!("🚀 Starting reviewrag API Server");
    println!("================================\n");
    println!("📍 Host: {host}");
    println!("🔌 Port: {port}");
    println!("🌐 CORS: {}", if cors { "Enabled" } else { "Disabled" });
    println!();

    match crate::api::serve_api(config, host, port, cors).await {
        Err(e @ ReviewRagError::CollectionNotFound(_)) => {
            print_error(&e.to_string());
            Err(e)
        }
        other => other,
    }
}
