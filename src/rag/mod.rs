//! RAG (Retrieval-Augmented Generation) module
//!
//! Answers questions about the indexed reviews:
//! - Embed the question and retrieve the K nearest review blocks
//! - Substitute their contents verbatim into the startup assistant prompt
//! - Generate the answer with the hosted chat model
//! - Attach one citation per retrieved block
//!
//! # Examples
//!
//! ```rust,no_run
//! use reviewrag::rag::RagService;
//! use reviewrag::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = RagService::new(&config).await?;
//!
//!     let response = service.query("What do pet shop customers complain about?").await?;
//!     println!("Answer: {}", response.answer);
//!     for citation in &response.citations {
//!         println!("{}", citation.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod pipeline;
pub mod retriever;

pub use context::ContextAssembler;
pub use pipeline::ChatReply;
pub use pipeline::RagResponse;
pub use pipeline::RagService;
pub use retriever::Retriever;
use serde::Deserialize;
use serde::Serialize;

use crate::indexer::review_preview;
use crate::store::SearchHit;

/// Prefix of the inline answer returned when a turn fails
pub const ERROR_PREFIX: &str = "Error processing request:";

/// Named snippet shown alongside an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// `Source i: <brand> (Score: <score>)`, 1-based
    pub name: String,
    /// Review text of the cited block
    pub content: String,
}

/// One citation per hit, numbered in retrieval order
#[must_use]
pub fn citations(hits: &[SearchHit]) -> Vec<Citation> {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| Citation {
            name: format!(
                "Source {}: {} (Score: {})",
                i + 1,
                hit.metadata.brand,
                hit.metadata.score
            ),
            content: review_preview(&hit.content),
        })
        .collect()
}

/// Inline answer for a failed turn
#[must_use]
pub fn error_answer(error: &impl std::fmt::Display) -> String {
    format!("{ERROR_PREFIX} {error}")
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::indexer::render_document;
    use crate::models::ReviewRecord;
    use crate::models::ScoredRecord;

    #[test]
    fn test_citations_numbered_with_preview() {
        let hits: Vec<SearchHit> = [("acme.com", "Great food", 4.75), ("bolt.io", "", 2.0)]
            .iter()
            .map(|(brand, text, score)| {
                let document = render_document(
                    &ScoredRecord {
                        review: ReviewRecord::new("food", *brand, *text, 4),
                        sentiment_polarity: 0.0,
                        implied_rating: 3.0,
                        weighted_score: *score,
                    },
                    "analyzed_reviews_food.csv",
                );
                SearchHit {
                    id: Uuid::new_v4(),
                    content: document.content,
                    metadata: document.metadata,
                    similarity: 0.9,
                }
            })
            .collect();

        let citations = citations(&hits);

        assert_eq!(citations[0].name, "Source 1: acme.com (Score: 4.75)");
        assert_eq!(citations[0].content, "Great food");
        assert_eq!(citations[1].name, "Source 2: bolt.io (Score: 2)");
        assert_eq!(citations[1].content, "No text");
    }

    #[test]
    fn test_error_answer() {
        let error = crate::ReviewRagError::LlmError("timeout".to_string());
        assert_eq!(
            error_answer(&error),
            format!("Error processing request: {error}")
        );
    }
}
