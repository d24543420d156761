//! JSON-file collection backend

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use super::cosine_similarity;
use super::CollectionEntry;
use super::SearchHit;
use crate::errors::ReviewRagError;
use crate::Result;

#[derive(Serialize, Deserialize)]
struct StoredCollection {
    name: String,
    entries: Vec<CollectionEntry>,
}

/// Collection held in memory and persisted to `<dir>/<name>.json`
#[derive(Debug)]
pub struct FileCollection {
    name: String,
    path: PathBuf,
    entries: Vec<CollectionEntry>,
}

impl FileCollection {
    /// Path of the JSON file backing collection `name` under `dir`
    #[must_use]
    pub fn file_path(dir: &Path, name: &str) -> PathBuf {
        dir.join(format!("{name}.json"))
    }

    /// Open an existing collection; a missing file or zero entries is
    /// `CollectionNotFound`
    pub fn open(dir: &Path, name: &str) -> Result<Self> {
        let path = Self::file_path(dir, name);
        if !path.exists() {
            return Err(ReviewRagError::CollectionNotFound(name.to_string()));
        }

        let collection = Self::load(&path, name)?;
        if collection.entries.is_empty() {
            return Err(ReviewRagError::CollectionNotFound(name.to_string()));
        }
        Ok(collection)
    }

    /// Open the collection, or start an empty one that is written on the
    /// first append
    pub fn open_or_create(dir: &Path, name: &str) -> Result<Self> {
        let path = Self::file_path(dir, name);
        if path.exists() {
            return Self::load(&path, name);
        }

        debug!("Starting new collection '{}' at {}", name, path.display());
        Ok(Self {
            name: name.to_string(),
            path,
            entries: Vec::new(),
        })
    }

    fn load(path: &Path, name: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let stored: StoredCollection = serde_json::from_str(&content).map_err(|e| {
            ReviewRagError::CollectionError(format!("{} is not a valid collection: {e}", path.display()))
        })?;

        if stored.name != name {
            return Err(ReviewRagError::CollectionError(format!(
                "{} holds collection '{}', expected '{name}'",
                path.display(),
                stored.name
            )));
        }

        debug!("Loaded {} entries from {}", stored.entries.len(), path.display());
        Ok(Self {
            name: stored.name,
            path: path.to_path_buf(),
            entries: stored.entries,
        })
    }

    /// Append entries and rewrite the file
    pub fn add_entries(&mut self, entries: Vec<CollectionEntry>) -> Result<()> {
        let added = entries.len();
        self.entries.extend(entries);
        self.persist()?;
        info!(
            "Added {} entries to collection '{}' ({} total)",
            added,
            self.name,
            self.entries.len()
        );
        Ok(())
    }

    /// Brute-force cosine scan; ties keep insertion order
    pub fn search(&self, embedding: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if let Some(entry) = self.entries.iter().find(|e| e.embedding.len() != embedding.len()) {
            return Err(ReviewRagError::CollectionError(format!(
                "Query has {} dimensions but collection '{}' stores {}",
                embedding.len(),
                self.name,
                entry.embedding.len()
            )));
        }

        let mut scored: Vec<(f32, &CollectionEntry)> = self
            .entries
            .iter()
            .map(|entry| (cosine_similarity(embedding, &entry.embedding), entry))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(similarity, entry)| SearchHit {
                id: entry.id,
                content: entry.content.clone(),
                metadata: entry.metadata.clone(),
                similarity,
            })
            .collect())
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.persist()?;
        info!("Cleared collection '{}'", self.name);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let stored = StoredCollection {
            name: self.name.clone(),
            entries: self.entries.clone(),
        };
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec(&stored)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Document;
    use crate::models::DocumentMetadata;

    fn entry(brand: &str, embedding: Vec<f32>) -> CollectionEntry {
        CollectionEntry::new(
            Document {
                content: format!("Brand: {brand}"),
                metadata: DocumentMetadata {
                    source: "analyzed_reviews_pets.csv".to_string(),
                    brand: brand.to_string(),
                    score: 3.5,
                },
            },
            embedding,
        )
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        match FileCollection::open(dir.path(), "absent") {
            Err(ReviewRagError::CollectionNotFound(name)) => assert_eq!(name, "absent"),
            other => panic!("expected CollectionNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_collection_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut collection = FileCollection::open_or_create(dir.path(), "empty").unwrap();
        collection.clear().unwrap();
        assert!(FileCollection::file_path(dir.path(), "empty").exists());
        assert!(matches!(
            FileCollection::open(dir.path(), "empty"),
            Err(ReviewRagError::CollectionNotFound(_))
        ));
    }

    #[test]
    fn test_search_orders_by_cosine() {
        let dir = tempfile::tempdir().unwrap();
        let mut collection = FileCollection::open_or_create(dir.path(), "ordering").unwrap();
        collection
            .add_entries(vec![
                entry("far", vec![0.0, 1.0]),
                entry("near", vec![1.0, 0.1]),
                entry("opposite", vec![-1.0, 0.0]),
                entry("mid", vec![1.0, 1.0]),
            ])
            .unwrap();

        let hits = collection.search(&[1.0, 0.0], 3).unwrap();
        let brands: Vec<&str> = hits.iter().map(|h| h.metadata.brand.as_str()).collect();
        assert_eq!(brands, vec!["near", "mid", "far"]);
        assert!(hits[0].similarity > hits[1].similarity);
    }

    #[test]
    fn test_k_larger_than_collection() {
        let dir = tempfile::tempdir().unwrap();
        let mut collection = FileCollection::open_or_create(dir.path(), "small").unwrap();
        collection.add_entries(vec![entry("only", vec![1.0])]).unwrap();
        assert_eq!(collection.search(&[1.0], 8).unwrap().len(), 1);
    }

    #[test]
    fn test_append_keeps_duplicates_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut collection = FileCollection::open_or_create(dir.path(), "dupes").unwrap();
        collection.add_entries(vec![entry("acme", vec![1.0, 0.0])]).unwrap();
        collection.add_entries(vec![entry("acme", vec![1.0, 0.0])]).unwrap();

        let reopened = FileCollection::open(dir.path(), "dupes").unwrap();
        assert_eq!(reopened.count(), 2);
        assert!(!dir.path().join("dupes.json.tmp").exists());
    }

    #[test]
    fn test_dimension_mismatch_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut collection = FileCollection::open_or_create(dir.path(), "dims").unwrap();
        collection.add_entries(vec![entry("acme", vec![1.0, 0.0, 0.0])]).unwrap();
        assert!(matches!(
            collection.search(&[1.0, 0.0], 1),
            Err(ReviewRagError::CollectionError(_))
        ));
    }

    #[test]
    fn test_name_mismatch_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut collection = FileCollection::open_or_create(dir.path(), "alpha").unwrap();
        collection.add_entries(vec![entry("acme", vec![1.0])]).unwrap();
        std::fs::rename(
            FileCollection::file_path(dir.path(), "alpha"),
            FileCollection::file_path(dir.path(), "beta"),
        )
        .unwrap();

        assert!(matches!(
            FileCollection::open(dir.path(), "beta"),
            Err(ReviewRagError::CollectionError(_))
        ));
    }
}
