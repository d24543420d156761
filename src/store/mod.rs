//! Persistent vector collection
//!
//! Indexed review blocks live in a named collection. Two backends are
//! supported, selected by `collection.backend`:
//! - `file`: one JSON document per collection, searched with a brute-force
//!   cosine scan
//! - `postgres`: a pgvector table searched with the `<=>` operator

pub mod file;
pub mod postgres;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

pub use file::FileCollection;
pub use postgres::PostgresCollection;

use crate::config::AppConfig;
use crate::config::CollectionBackend;
use crate::models::Document;
use crate::models::DocumentMetadata;
use crate::Result;

/// One persisted review block with its embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub id: Uuid,
    pub content: String,
    pub metadata: DocumentMetadata,
    pub embedding: Vec<f32>,
}

impl CollectionEntry {
    /// Wrap a rendered document with a fresh random id
    pub fn new(document: Document, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: document.content,
            metadata: document.metadata,
            embedding,
        }
    }
}

/// A search result, most similar first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: Uuid,
    pub content: String,
    pub metadata: DocumentMetadata,
    pub similarity: f32,
}

/// Cosine similarity of two vectors; 0.0 when either has zero norm
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Named vector collection on one of the configured backends
pub enum VectorCollection {
    File(FileCollection),
    Postgres(PostgresCollection),
}

impl VectorCollection {
    /// Open an existing, non-empty collection.
    ///
    /// # Errors
    /// `CollectionNotFound` when the collection is missing or holds no entries.
    pub async fn open(config: &AppConfig) -> Result<Self> {
        let name = &config.collection.name;
        match config.collection.backend {
            CollectionBackend::File => Ok(Self::File(FileCollection::open(
                &config.collection.path,
                name,
            )?)),
            CollectionBackend::Postgres => Ok(Self::Postgres(
                PostgresCollection::open(&config.database, name).await?,
            )),
        }
    }

    /// Open the collection, starting an empty one if it does not exist yet
    pub async fn open_or_create(config: &AppConfig) -> Result<Self> {
        let name = &config.collection.name;
        match config.collection.backend {
            CollectionBackend::File => Ok(Self::File(FileCollection::open_or_create(
                &config.collection.path,
                name,
            )?)),
            CollectionBackend::Postgres => Ok(Self::Postgres(
                PostgresCollection::connect(&config.database, name).await?,
            )),
        }
    }

    /// Append entries in one bulk write
    pub async fn add_entries(&mut self, entries: Vec<CollectionEntry>) -> Result<()> {
        match self {
            Self::File(collection) => collection.add_entries(entries),
            Self::Postgres(collection) => collection.add_entries(entries).await,
        }
    }

    /// The `k` entries most similar to `embedding`
    pub async fn search(&self, embedding: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        match self {
            Self::File(collection) => collection.search(embedding, k),
            Self::Postgres(collection) => collection.search(embedding, k).await,
        }
    }

    pub async fn count(&self) -> Result<usize> {
        match self {
            Self::File(collection) => Ok(collection.count()),
            Self::Postgres(collection) => collection.count().await,
        }
    }

    /// Remove every entry, keeping the collection itself
    pub async fn clear(&mut self) -> Result<()> {
        match self {
            Self::File(collection) => collection.clear(),
            Self::Postgres(collection) => collection.clear().await,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::File(collection) => collection.name(),
            Self::Postgres(collection) => collection.name(),
        }
    }

    pub const fn backend(&self) -> CollectionBackend {
        match self {
            Self::File(_) => CollectionBackend::File,
            Self::Postgres(_) => CollectionBackend::Postgres,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-6);
        // Scale does not matter
        assert!((cosine_similarity(&[2.0, 2.0], &[1.0, 1.0]) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn test_file_backend_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.collection.path = dir.path().to_path_buf();
        config.collection.name = "dispatch_test".to_string();

        assert!(matches!(
            VectorCollection::open(&config).await,
            Err(crate::ReviewRagError::CollectionNotFound(_))
        ));

        let mut collection = VectorCollection::open_or_create(&config).await.unwrap();
        assert_eq!(collection.backend(), CollectionBackend::File);
        let document = Document {
            content: "Review: fine".to_string(),
            metadata: DocumentMetadata {
                source: "analyzed_reviews_pets.csv".to_string(),
                brand: "acme.com".to_string(),
                score: 4.0,
            },
        };
        collection
            .add_entries(vec![CollectionEntry::new(document, vec![1.0, 0.0])])
            .await
            .unwrap();

        let reopened = VectorCollection::open(&config).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
        assert_eq!(reopened.name(), "dispatch_test");
    }
}
