//! Chat completion client for OpenAI-compatible endpoints

pub mod prompts;

use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

pub use prompts::PromptTemplate;
pub use prompts::RagPrompts;

use crate::config::AppConfig;
use crate::config::LlmConfig;
use crate::errors::ReviewRagError;
use crate::errors::Result;

/// One message in a chat completion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Client for a hosted `/chat/completions` service
pub struct LlmService {
    client: Client,
    config: LlmConfig,
}

impl LlmService {
    /// # Errors
    /// - `ConfigError` when no API key is configured
    pub fn new(config: &AppConfig) -> Result<Self> {
        Self::from_config(config.llm.clone())
    }

    pub fn from_config(config: LlmConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ReviewRagError::ConfigError(
                "llm.api_key not provided (set REVIEWRAG__LLM__API_KEY)".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| ReviewRagError::HttpError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Single-prompt completion with the configured temperature and token limit
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_params(prompt, self.config.temperature, self.config.max_tokens)
            .await
    }

    pub async fn generate_with_params(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<String> {
        self.chat(vec![ChatMessage::user(prompt)], temperature, max_tokens)
            .await
    }

    /// Send `messages` and return the first choice's content
    pub async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        temperature: f32,
        max_tokens: usize,
    ) -> Result<String> {
        #[derive(Serialize)]
        struct ChatRequest<'a> {
            model: &'a str,
            messages: Vec<ChatMessage>,
            temperature: f32,
            max_tokens: usize,
        }

        #[derive(Deserialize)]
        struct ChatResponse {
            choices: Vec<Choice>,
        }

        #[derive(Deserialize)]
        struct Choice {
            message: ResponseMessage,
        }

        #[derive(Deserialize)]
        struct ResponseMessage {
            #[serde(default)]
            content: Option<String>,
        }

        let url = format!("{}/chat/completions", self.config.endpoint.trim_end_matches('/'));
        debug!("Calling chat completion API: {} ({})", url, self.config.model);

        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ReviewRagError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ReviewRagError::LlmError(format!(
                "Chat completion error ({status}): {error_text}"
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| ReviewRagError::LlmError(format!("Failed to parse response: {e}")))?;

        result
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ReviewRagError::LlmError("Response contained no message".to_string()))
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }
}
