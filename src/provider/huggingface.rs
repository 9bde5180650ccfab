//! Hugging-Face-style inference adapter.
//!
//! Open-weight hosts are known to answer with prose or bare code instead of
//! the requested JSON, so this adapter is lenient: when structured parsing
//! fails it falls back to the synthetic text extraction before giving up.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::provider::retry::request_with_model_fallback;
use crate::provider::{parse, prompt, ProviderSettings, ReviewProvider};
use crate::types::{CodeSubmission, ReviewResult};

/// Review provider backed by a Hugging-Face-style inference API.
#[derive(Debug, Clone)]
pub struct HuggingFaceProvider {
    client: Client,
    settings: ProviderSettings,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    return_full_text: bool,
}

#[derive(Deserialize)]
struct InferenceResponse {
    generated_text: String,
}

impl HuggingFaceProvider {
    /// Create a new adapter from connection settings.
    pub fn new(settings: ProviderSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(super::user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, settings })
    }

    /// One inference round-trip against a specific model.
    async fn complete(&self, review_prompt: &str, model: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}",
            self.settings.base_url.trim_end_matches('/'),
            model
        );
        let request = InferenceRequest {
            inputs: review_prompt,
            parameters: InferenceParameters {
                max_new_tokens: 2048,
                return_full_text: false,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.settings.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 503 {
            // The host answers 503 while a cold model is loading; treat it
            // like a rate limit so the fixed-delay retry gives it time.
            let body = response.text().await.unwrap_or_default();
            return Err(Error::RateLimited(format!("model is loading: {}", body)));
        }
        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or("Unknown");
            let body = response.text().await.unwrap_or_default();
            return Err(Error::provider(status.as_u16(), status_text, body));
        }

        let parsed: Vec<InferenceResponse> = response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(format!("invalid inference payload: {}", e)))?;

        parsed
            .into_iter()
            .next()
            .map(|entry| entry.generated_text)
            .ok_or_else(|| Error::MalformedResponse("inference response is empty".to_string()))
    }
}

#[async_trait]
impl ReviewProvider for HuggingFaceProvider {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn request_review(&self, submission: &CodeSubmission) -> Option<ReviewResult> {
        let review_prompt = prompt::build_prompt(submission);
        let line_count = submission.code.lines().count() as u32;
        debug!(
            language = %submission.language,
            lines = line_count,
            "requesting Hugging Face review"
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
                    parse::parse_review(&text, line_count).or_else(|err| {
                        debug!(error = %err, "structured parse failed, trying synthetic extraction");
                        parse::extract_from_text(&text)
                    })
                }
            },
        )
        .await
    }
}
