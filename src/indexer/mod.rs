//! Indexing stage
//!
//! Scored records are rendered into text blocks, embedded in batches and
//! appended to the persistent collection. Indexing never deduplicates: run
//! with `reset` to start from an empty collection.

use std::path::Path;

use tracing::info;
use tracing::warn;

use crate::dataset;
use crate::dataset::StageReport;
use crate::embeddings::EmbeddingService;
use crate::models::Document;
use crate::models::DocumentMetadata;
use crate::models::ScoredFile;
use crate::models::ScoredRecord;
use crate::store::CollectionEntry;
use crate::store::VectorCollection;
use crate::Result;

/// Placeholder rendered for reviews without text
pub const EMPTY_REVIEW_TEXT: &str = "No text";

const REVIEW_FIELD: &str = "Review:";
const RATING_FIELD: &str = "Rating:";

/// Render one scored record as an embeddable text block
#[must_use]
pub fn render_document(record: &ScoredRecord, source_file: &str) -> Document {
    let review = &record.review;
    let text = if review.text.trim().is_empty() {
        EMPTY_REVIEW_TEXT
    } else {
        review.text.as_str()
    };

    let content = format!(
        "Category: {}\nBrand: {}\n{REVIEW_FIELD} {}\n{RATING_FIELD} {}\nWeighted Score: {}",
        review.category, review.brand, text, review.star_rating, record.weighted_score
    );

    Document {
        content,
        metadata: DocumentMetadata {
            source: source_file.to_string(),
            brand: review.brand.clone(),
            score: record.weighted_score,
        },
    }
}

/// Review text of a rendered block: everything between `Review:` and the
/// following `Rating:` field, trimmed. Blocks without a `Review:` field are
/// returned whole.
#[must_use]
pub fn review_preview(content: &str) -> String {
    let Some(start) = content.find(REVIEW_FIELD) else {
        return content.trim().to_string();
    };
    let rest = &content[start + REVIEW_FIELD.len()..];
    let end = rest.find(&format!("\n{RATING_FIELD}")).unwrap_or(rest.len());
    rest[..end].trim().to_string()
}

/// Render every record of an in-memory scored set
#[must_use]
pub fn documents_from_scored(files: &[ScoredFile]) -> Vec<Document> {
    files
        .iter()
        .flat_map(|file| {
            file.records
                .iter()
                .map(|record| render_document(record, &file.source))
        })
        .collect()
}

/// Read every scored CSV under `dir` into documents; unreadable files are
/// logged and skipped
pub fn load_documents(dir: &Path) -> Result<(Vec<Document>, StageReport)> {
    let files = dataset::list_csv_files(dir)?;
    let mut documents = Vec::new();
    let mut report = StageReport::default();

    for path in files {
        let name = dataset::file_name(&path);
        match dataset::read_scored(&path) {
            Ok(records) => {
                documents.extend(records.iter().map(|record| render_document(record, &name)));
                report.record_success(name, records.len());
            }
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                report.record_skip(name, e);
            }
        }
    }

    info!(
        "Loaded {} document(s) from {} file(s)",
        documents.len(),
        report.processed.len()
    );
    Ok((documents, report))
}

/// Embed `documents` and append them to `collection` in one bulk write.
/// Returns the number of entries added.
pub async fn build_index(
    documents: Vec<Document>,
    embeddings: &EmbeddingService,
    collection: &mut VectorCollection,
) -> Result<usize> {
    if documents.is_empty() {
        warn!("No documents to index");
        return Ok(0);
    }

    info!(
        "Embedding {} document(s) with model {}",
        documents.len(),
        embeddings.model()
    );
    let texts: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
    let vectors = embeddings.generate_batch(&texts).await?;

    let entries: Vec<CollectionEntry> = documents
        .into_iter()
        .zip(vectors)
        .map(|(document, embedding)| CollectionEntry::new(document, embedding))
        .collect();
    let added = entries.len();
    collection.add_entries(entries).await?;

    info!("Indexed {} entries into '{}'", added, collection.name());
    Ok(added)
}

/// Load `dir`, optionally clear the collection, then index everything
pub async fn index_directory(
    dir: &Path,
    embeddings: &EmbeddingService,
    collection: &mut VectorCollection,
    reset: bool,
) -> Result<StageReport> {
    let (documents, report) = load_documents(dir)?;
    if reset {
        collection.clear().await?;
    }
    build_index(documents, embeddings, collection).await?;
    Ok(report)
}
