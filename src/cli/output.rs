//! CLI output formatting utilities

use crate::dataset::StageReport;
use crate::rag::ChatReply;
use crate::AppConfig;

/// Truncate at a character boundary, appending "..." when shortened
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Per-file summary of a stage run
pub fn print_stage_report(stage: &str, report: &StageReport) {
    println!();
    println!("📊 {stage} summary:");
    for (file, count) in &report.processed {
        println!("  ✓ {file}: {count} record(s)");
    }
    for (file, reason) in &report.skipped {
        println!("  ✗ {file}: {}", truncate_str(reason, 120));
    }
    println!(
        "  Total: {} record(s) from {} file(s), {} skipped",
        report.total_records(),
        report.processed.len(),
        report.skipped.len()
    );
}

/// Answer followed by its citations
pub fn print_reply(reply: &ChatReply) {
    println!("\n{}", "═".repeat(80));
    if reply.is_error {
        print_error(&reply.answer);
    } else {
        println!("{}", reply.answer.trim());
    }
    println!("{}", "═".repeat(80));

    if !reply.citations.is_empty() {
        println!("\n📚 Sources:");
        for citation in &reply.citations {
            println!("  {}", citation.name);
            println!("     \"{}\"", truncate_str(&citation.content, 200));
        }
    }
    println!();
}

/// Print configuration with secrets masked
pub fn print_config(config: &AppConfig) {
    let config = config.redacted();
    println!("📋 reviewrag Configuration:");
    println!();

    println!("🕸️  Collector:");
    println!("  Categories: {}", config.collector.categories.len());
    println!("  Shops per category: {}", config.collector.max_shops_per_category);
    println!("  Reviews per shop: {}", config.collector.target_reviews_per_shop);
    println!(
        "  Page delay: {}-{}s, shop delay: {}-{}s",
        config.collector.page_delay.min_secs,
        config.collector.page_delay.max_secs,
        config.collector.shop_delay.min_secs,
        config.collector.shop_delay.max_secs
    );
    println!("  Output: {}", config.collector.output_dir.display());
    println!();

    println!("💬 Scorer:");
    println!("  Input: {}", config.scorer.input_dir.display());
    println!("  Output: {}", config.scorer.output_dir.display());
    println!();

    println!("🗄️  Collection:");
    println!("  Backend: {:?}", config.collection.backend);
    println!("  Name: {}", config.collection.name);
    println!("  Path: {}", config.collection.path.display());
    println!("  Database: {}", mask_database_url(&config.database.url));
    println!();

    println!("🧠 Embeddings:");
    println!("  Provider: {:?}", config.embeddings.provider);
    println!("  Endpoint: {}", config.embeddings.endpoint);
    println!("  Model: {} ({} dims)", config.embeddings.model, config.embeddings.dimension);
    if let Some(key) = &config.embeddings.api_key {
        println!("  Key: {key}");
    }
    println!();

    println!("🤖 LLM:");
    println!("  Endpoint: {}", config.llm.endpoint);
    println!("  Model: {}", config.llm.model);
    println!("  Temperature: {}", config.llm.temperature);
    println!("  Key: {}", config.llm.api_key);
    println!("  Top K: {}", config.assistant.top_k);
    println!();

    println!("🌐 Server:");
    println!("  Address: {}:{}", config.server.host, config.server.port);
    println!("  Session timeout: {}s", config.server.session_timeout_secs);
    println!();

    println!("📝 Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Directory: {}", config.logging.directory.display());
}

/// Mask database URL for display (hide password)
fn mask_database_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        if let Some(host) = parsed.host_str() {
            format!(
                "{}://{}@{}:{}{}",
                parsed.scheme(),
                parsed.username(),
                host,
                parsed.port().unwrap_or(5432),
                parsed.path()
            )
        } else {
            "***masked***".to_string()
        }
    } else {
        "***invalid***".to_string()
    }
}

pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

pub fn print_error(msg: &str) {
    println!("❌ {msg}");
}

pub fn print_prompt(msg: &str) {
    use std::io::Write;
    print!("{msg}");
    let _ = std::io::stdout().flush();
}
