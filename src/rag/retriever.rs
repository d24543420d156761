//! Nearest-neighbour retrieval over the review collection

use std::sync::Arc;

use tracing::debug;

use crate::embeddings::EmbeddingService;
use crate::errors::Result;
use crate::store::SearchHit;
use crate::store::VectorCollection;

/// Embeds questions and searches the collection
pub struct Retriever {
    collection: Arc<VectorCollection>,
    embedding_service: Arc<EmbeddingService>,
}

impl Retriever {
    pub fn new(collection: Arc<VectorCollection>, embedding_service: Arc<EmbeddingService>) -> Self {
        Self {
            collection,
            embedding_service,
        }
    }

    /// The `k` blocks closest to `query` by cosine similarity
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        debug!("Retrieving top {} for: {}", k, query);
        let query_embedding = self.embedding_service.generate(query).await?;
        let hits = self.collection.search(&query_embedding, k).await?;
        debug!("Retrieved {} hits", hits.len());
        Ok(hits)
    }

    #[must_use]
    pub fn collection(&self) -> &VectorCollection {
        &self.collection
    }
}
