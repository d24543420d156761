//! Collection, scoring and indexing handlers

use std::path::PathBuf;

use tracing::info;

use crate::cli::output::*;
use crate::collector;
use crate::collector::ReviewCollector;
use crate::embeddings::EmbeddingService;
use crate::indexer;
use crate::sentiment;
use crate::sentiment::Scorer;
use crate::sentiment::VaderAnalyzer;
use crate::store::VectorCollection;
use crate::AppConfig;
use crate::Result;

pub async fn handle_collect(config: &AppConfig, output: Option<PathBuf>) -> Result<()> {
    let output = output.unwrap_or_else(|| config.collector.output_dir.clone());
    print_info(&format!(
        "🕸️  Collecting reviews for {} categor(ies) into {}",
        config.collector.categories.len(),
        output.display()
    ));

    let collector = ReviewCollector::new(config.collector.clone())?;
    let report = collector::collect_directory(&collector, &output).await?;

    print_stage_report("Collection", &report);
    Ok(())
}

pub fn handle_score(
    config: &AppConfig,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let input = input.unwrap_or_else(|| config.scorer.input_dir.clone());
    let output = output.unwrap_or_else(|| config.scorer.output_dir.clone());
    print_info(&format!(
        "💬 Scoring reviews from {} into {}",
        input.display(),
        output.display()
    ));

    let scorer = Scorer::new(VaderAnalyzer::new());
    let report = sentiment::score_directory(&scorer, &input, &output)?;

    print_stage_report("Scoring", &report);
    Ok(())
}

pub async fn handle_index(config: &AppConfig, input: Option<PathBuf>, reset: bool) -> Result<()> {
    let input = input.unwrap_or_else(|| config.scorer.output_dir.clone());
    print_info(&format!(
        "🧠 Indexing scored reviews from {} into '{}'",
        input.display(),
        config.collection.name
    ));

    let embeddings = EmbeddingService::new(config)?;
    let mut collection = VectorCollection::open_or_create(config).await?;
    if reset {
        print_warning("Clearing the collection before indexing");
    }
    let report = indexer::index_directory(&input, &embeddings, &mut collection, reset).await?;

    print_stage_report("Indexing", &report);
    print_success(&format!(
        "Collection '{}' now holds {} entries",
        collection.name(),
        collection.count().await?
    ));
    Ok(())
}

/// Collect, score and index, handing records from stage to stage in memory.
/// Intermediate CSVs are still written so stages can be re-run separately.
pub async fn handle_run(config: &AppConfig, reset: bool) -> Result<()> {
    println!("🚀 reviewrag pipeline");
    println!("====================\n");

    println!("🕸️  Step 1: Collecting reviews...");
    let collector = ReviewCollector::new(config.collector.clone())?;
    let categories = collector.collect_all().await;
    let report = collector::write_categories(&categories, &config.collector.output_dir)?;
    print_stage_report("Collection", &report);
    if report.total_records() == 0 {
        print_warning("No reviews collected; nothing to score");
        return Ok(());
    }

    println!("\n💬 Step 2: Scoring sentiment...");
    let scorer = Scorer::new(VaderAnalyzer::new());
    let (scored, report) =
        sentiment::score_categories(&scorer, categories, &config.scorer.output_dir)?;
    print_stage_report("Scoring", &report);

    println!("\n🧠 Step 3: Indexing...");
    let documents = indexer::documents_from_scored(&scored);
    let embeddings = EmbeddingService::new(config)?;
    let mut collection = VectorCollection::open_or_create(config).await?;
    if reset {
        collection.clear().await?;
    }
    let added = indexer::build_index(documents, &embeddings, &mut collection).await?;
    info!("Pipeline finished with {} new entries", added);

    print_success(&format!(
        "Indexed {added} review(s); collection '{}' holds {} entries",
        collection.name(),
        collection.count().await?
    ));
    Ok(())
}
