//! Embedding generation service with batch processing

use std::sync::Arc;

use tracing::debug;

use super::client::EmbeddingClient;
use super::preprocess_text_for_embedding;
use super::EmbeddingConfig;
use super::MAX_BATCH_SIZE;
use crate::errors::Result;

/// Service for generating embeddings
pub struct EmbeddingService {
    client: Arc<EmbeddingClient>,
    config: EmbeddingConfig,
}

impl EmbeddingService {
    /// Create a new embedding service
    pub fn new(config: &crate::config::AppConfig) -> Result<Self> {
        Self::from_config(EmbeddingConfig::from_app_config(config))
    }

    /// Create from custom config
    pub fn from_config(config: EmbeddingConfig) -> Result<Self> {
        let client = EmbeddingClient::new(
            config.provider,
            config.model.clone(),
            config.endpoint.clone(),
            config.api_key.clone(),
        )?;

        Ok(Self {
            client: Arc::new(client),
            config,
        })
    }

    /// Generate embedding for a single text
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let processed_text = preprocess_text_for_embedding(text)?;
        self.client.generate(&processed_text).await
    }

    /// Generate embeddings for multiple texts in batches of `MAX_BATCH_SIZE`.
    ///
    /// Texts that are empty after preprocessing get a zero vector so the
    /// output stays aligned with the input.
    pub async fn generate_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut processed_texts = Vec::with_capacity(texts.len());
        let mut empty_positions = Vec::new();
        for (i, text) in texts.iter().enumerate() {
            match preprocess_text_for_embedding(text) {
                Ok(processed) => processed_texts.push(processed),
                Err(_) => empty_positions.push(i),
            }
        }

        let mut embeddings = Vec::with_capacity(texts.len());
        for (batch_idx, chunk) in processed_texts.chunks(MAX_BATCH_SIZE).enumerate() {
            debug!("Embedding batch {} ({} texts)", batch_idx + 1, chunk.len());
            let chunk_embeddings = self
                .client
                .generate_batch(chunk.iter().map(String::as_str).collect())
                .await?;
            embeddings.extend(chunk_embeddings);
        }

        // Insert zero vectors for empty texts at correct positions
        let zero_vector = vec![0.0; self.config.dimension];
        for pos in empty_positions {
            embeddings.insert(pos, zero_vector.clone());
        }

        Ok(embeddings)
    }

    /// Get the model name
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use axum::routing::post;
    use axum::Json;
    use axum::Router;
    use serde_json::json;
    use serde_json::Value;

    use super::*;
    use crate::embeddings::EmbeddingProvider;
    use crate::tests::spawn_router;

    #[tokio::test]
    async fn test_blank_texts_get_zero_vectors_in_place() {
        let app = Router::new().route(
            "/api/embeddings",
            post(|Json(body): Json<Value>| async move {
                let len = body["prompt"].as_str().unwrap_or_default().len() as f32;
                Json(json!({ "embedding": [len, len, len] }))
            }),
        );
        let endpoint = spawn_router(app).await;

        let service = EmbeddingService::from_config(EmbeddingConfig {
            provider: EmbeddingProvider::Ollama,
            model: "all-minilm".to_string(),
            dimension: 3,
            endpoint,
            api_key: None,
        })
        .unwrap();

        let embeddings = service
            .generate_batch(&["", "ab", "  ", "abcd"])
            .await
            .unwrap();

        assert_eq!(
            embeddings,
            vec![
                vec![0.0, 0.0, 0.0],
                vec![2.0, 2.0, 2.0],
                vec![0.0, 0.0, 0.0],
                vec![4.0, 4.0, 4.0],
            ]
        );
    }
}
