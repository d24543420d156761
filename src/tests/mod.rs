//! Shared helpers for unit tests: local mock servers and service fixtures

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde_json::json;
use serde_json::Value;

use crate::config::AppConfig;
use crate::config::LlmConfig;
use crate::embeddings::EmbeddingConfig;
use crate::embeddings::EmbeddingProvider;
use crate::embeddings::EmbeddingService;
use crate::llm::LlmService;
use crate::models::Document;
use crate::models::DocumentMetadata;
use crate::rag::RagService;
use crate::store::CollectionEntry;
use crate::store::FileCollection;
use crate::store::VectorCollection;

/// Serve `app` on an ephemeral local port and return its base URL
pub async fn spawn_router(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Model endpoints: every text embeds as `[1, 0]`; the chat model echoes the
/// prompt back, or fails with `llm_status` when it is not 200
pub async fn spawn_model_server(llm_status: StatusCode) -> String {
    spawn_model_server_with_delay(llm_status, Duration::ZERO).await
}

/// Same endpoints, with each chat completion taking `chat_delay`
pub async fn spawn_model_server_with_delay(llm_status: StatusCode, chat_delay: Duration) -> String {
    spawn_router(
        Router::new()
            .route(
                "/api/embeddings",
                post(|| async { Json(json!({ "embedding": [1.0, 0.0] })) }),
            )
            .route(
                "/chat/completions",
                post(move |Json(body): Json<Value>| async move {
                    tokio::time::sleep(chat_delay).await;
                    if llm_status != StatusCode::OK {
                        return (llm_status, Json(json!({ "error": "upstream down" })));
                    }
                    let prompt = body["messages"][0]["content"].clone();
                    (
                        StatusCode::OK,
                        Json(json!({ "choices": [{ "message": { "content": prompt } }] })),
                    )
                }),
            ),
    )
    .await
}

pub fn review_entry(brand: &str, text: &str, score: f64, embedding: Vec<f32>) -> CollectionEntry {
    CollectionEntry::new(
        Document {
            content: format!("Brand: {brand}\nReview: {text}\nRating: 4"),
            metadata: DocumentMetadata {
                source: "analyzed_reviews_pets.csv".to_string(),
                brand: brand.to_string(),
                score,
            },
        },
        embedding,
    )
}

/// Assistant over a three-entry file collection in `dir`, with `top_k = 2`.
///
/// Against the `[1, 0]` question embedding the entries rank
/// `near.com`, `mid.com`, `far.com`.
pub async fn rag_fixture(dir: &Path, llm_status: StatusCode) -> RagService {
    rag_fixture_with_delay(dir, llm_status, Duration::ZERO).await
}

pub async fn rag_fixture_with_delay(
    dir: &Path,
    llm_status: StatusCode,
    chat_delay: Duration,
) -> RagService {
    let endpoint = spawn_model_server_with_delay(llm_status, chat_delay).await;

    let mut collection = FileCollection::open_or_create(dir, "rag_test").unwrap();
    collection
        .add_entries(vec![
            review_entry("far.com", "Slow", 1.5, vec![0.0, 1.0]),
            review_entry("near.com", "Fast shipping", 4.75, vec![1.0, 0.0]),
            review_entry("mid.com", "Okay", 3.0, vec![1.0, 1.0]),
        ])
        .unwrap();

    let mut config = AppConfig::default();
    config.assistant.top_k = 2;
    let embeddings = EmbeddingService::from_config(EmbeddingConfig {
        provider: EmbeddingProvider::Ollama,
        model: "all-minilm".to_string(),
        dimension: 2,
        endpoint: endpoint.clone(),
        api_key: None,
    })
    .unwrap();
    let llm = LlmService::from_config(LlmConfig {
        endpoint,
        api_key: "sk-test".to_string(),
        ..LlmConfig::default()
    })
    .unwrap();

    RagService::from_services(
        Arc::new(VectorCollection::File(collection)),
        Arc::new(embeddings),
        llm,
        &config,
    )
}
