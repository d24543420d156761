//! Complete RAG pipeline: Retrieve -> Assemble -> Generate

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use super::citations;
use super::error_answer;
use super::Citation;
use crate::config::AppConfig;
use crate::embeddings::EmbeddingService;
use crate::errors::Result;
use crate::llm::LlmService;
use crate::llm::RagPrompts;
use crate::rag::ContextAssembler;
use crate::rag::Retriever;
use crate::store::SearchHit;
use crate::store::VectorCollection;

/// Question answering over the review collection
pub struct RagService {
    retriever: Retriever,
    context_assembler: ContextAssembler,
    llm_service: LlmService,
    top_k: usize,
    temperature: f32,
    max_tokens: usize,
}

impl RagService {
    /// Open the collection and build the services.
    ///
    /// # Errors
    /// - `CollectionNotFound` when nothing has been indexed yet
    /// - Embedding or LLM configuration errors (missing API key)
    pub async fn new(config: &AppConfig) -> Result<Self> {
        let collection = Arc::new(VectorCollection::open(config).await?);
        let embedding_service = Arc::new(EmbeddingService::new(config)?);
        let llm_service = LlmService::new(config)?;
        Ok(Self::from_services(collection, embedding_service, llm_service, config))
    }

    /// Create from existing services
    #[must_use]
    pub fn from_services(
        collection: Arc<VectorCollection>,
        embedding_service: Arc<EmbeddingService>,
        llm_service: LlmService,
        config: &AppConfig,
    ) -> Self {
        Self {
            retriever: Retriever::new(collection, embedding_service),
            context_assembler: ContextAssembler::default(),
            llm_service,
            top_k: config.assistant.top_k,
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
        }
    }

    /// Answer `question` from the `top_k` nearest review blocks
    ///
    /// # Errors
    /// - Embedding failures for the question
    /// - Collection search errors
    /// - LLM generation errors (API failures, rate limits, invalid responses)
    pub async fn query(&self, question: &str) -> Result<RagResponse> {
        info!("Processing question: {}", question);

        debug!("Step 1: Retrieving review blocks");
        let sources = self.retriever.retrieve(question, self.top_k).await?;

        debug!("Step 2: Assembling context from {} blocks", sources.len());
        let context = self.context_assembler.assemble(&sources);

        debug!("Step 3: Generating answer with {}", self.llm_service.model());
        let prompt = RagPrompts::render_startup_assistant(&context, question);
        let answer = self
            .llm_service
            .generate_with_params(&prompt, self.temperature, self.max_tokens)
            .await?;

        Ok(RagResponse {
            answer,
            citations: citations(&sources),
            sources,
            query: question.to_string(),
        })
    }

    /// One chat turn; failures become an inline error answer
    pub async fn respond(&self, question: &str) -> ChatReply {
        match self.query(question).await {
            Ok(response) => ChatReply {
                answer: response.answer,
                citations: response.citations,
                is_error: false,
            },
            Err(e) => {
                warn!("Chat turn failed: {}", e);
                ChatReply {
                    answer: error_answer(&e),
                    citations: Vec::new(),
                    is_error: true,
                }
            }
        }
    }

    #[must_use]
    pub const fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    #[must_use]
    pub const fn top_k(&self) -> usize {
        self.top_k
    }
}

/// RAG response
#[derive(Debug, Clone)]
pub struct RagResponse {
    pub answer: String,
    pub sources: Vec<SearchHit>,
    pub citations: Vec<Citation>,
    pub query: String,
}

impl RagResponse {
    /// Get a formatted string representation
    #[must_use]
    pub fn format(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Answer:\n{}\n\n", self.answer));
        output.push_str(&format!("Sources ({}):\n", self.citations.len()));
        for citation in &self.citations {
            output.push_str(&format!("  {}\n", citation.name));
        }
        output
    }
}

/// What a chat surface shows for one turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    pub citations: Vec<Citation>,
    pub is_error: bool,
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;
    use crate::tests::rag_fixture;

    #[tokio::test]
    async fn test_query_uses_top_k_context_and_citations() {
        let dir = tempfile::tempdir().unwrap();
        let service = rag_fixture(dir.path(), StatusCode::OK).await;

        let response = service.query("Who ships fastest?").await.unwrap();

        assert_eq!(response.sources.len(), 2);
        assert!(response.answer.contains("Review: Fast shipping"));
        assert!(response.answer.contains("Review: Okay"));
        assert!(!response.answer.contains("Review: Slow"));
        assert!(response.answer.contains("Who ships fastest?"));
        assert_eq!(response.citations[0].name, "Source 1: near.com (Score: 4.75)");
        assert_eq!(response.citations[0].content, "Fast shipping");
        assert_eq!(response.citations[1].name, "Source 2: mid.com (Score: 3)");
        assert!(response.format().contains("Sources (2):"));
    }

    #[tokio::test]
    async fn test_failed_turn_is_inline_and_service_stays_usable() {
        let dir = tempfile::tempdir().unwrap();
        let service = rag_fixture(dir.path(), StatusCode::SERVICE_UNAVAILABLE).await;

        let reply = service.respond("Anything?").await;
        assert!(reply.is_error);
        assert!(reply.answer.starts_with("Error processing request: "));
        assert!(reply.citations.is_empty());

        let again = service.respond("Still there?").await;
        assert!(again.answer.starts_with("Error processing request: "));
    }

    #[tokio::test]
    async fn test_new_without_collection_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.collection.path = dir.path().to_path_buf();
        config.llm.api_key = "sk-test".to_string();

        assert!(matches!(
            RagService::new(&config).await,
            Err(crate::ReviewRagError::CollectionNotFound(_))
        ));
    }
}
