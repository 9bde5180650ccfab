//! OpenAI-style chat-completions adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::provider::retry::request_with_model_fallback;
use crate::provider::{parse, prompt, ProviderSettings, ReviewProvider};
use crate::types::{CodeSubmission, ReviewResult};

/// Review provider backed by an OpenAI-compatible chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    settings: ProviderSettings,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl OpenAiProvider {
    /// Create a new adapter from connection settings.
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(super::user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, settings })
    }

    /// One completion round-trip against a specific model.
    async fn complete(&self, review_prompt: &str, model: &str) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        );
        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: review_prompt,
            }],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.settings.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or("Unknown");
            let body = response.text().await.unwrap_or_default();
            return Err(Error::provider(status.as_u16(), status_text, body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(format!("invalid completion payload: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| Error::MalformedResponse("completion has no choices".to_string()))
    }
}

#[async_trait]
impl ReviewProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn request_review(&self, submission: &CodeSubmission) -> Option<ReviewResult> {
        let review_prompt = prompt::build_prompt(submission);
        let line_count = submission.code.lines().count() as u32;
        debug!(
            language = %submission.language,
            lines = line_count,
            "requesting OpenAI review"
        );

        request_with_model_fallback(
            &self.settings.retry,
            self.name(),
            &self.settings.primary_model,
            &self.settings.fallback_model,
            |model| {
                let review_prompt = review_prompt.clone();
                async move {
                    let text = self.complete(&review_prompt, &model).await?;
                    // Strict adapter: a response that fails schema validation
                    // is a model failure, not a candidate for synthetic repair.
                    parse::parse_review(&text, line_count)
                }
            },
        )
        .await
    }
}
