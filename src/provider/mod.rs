//! AI provider clients.
//!
//! One adapter per backend, behind the [`ReviewProvider`] trait. Each adapter
//! builds a provider-specific prompt, invokes the remote model, parses and
//! repairs the response into the canonical [`ReviewResult`] shape, and applies
//! the shared retry / in-provider model-fallback policy.
//!
//! Adapters never surface errors to the orchestrator: every failure mode
//! collapses to `None` once the retry policy is exhausted. A provider either
//! returns a complete well-formed result or nothing.

pub mod huggingface;
pub mod openai;
pub mod parse;
pub mod prompt;
pub mod retry;

pub use huggingface::HuggingFaceProvider;
pub use openai::OpenAiProvider;
pub use retry::RetryPolicy;

use async_trait::async_trait;
use std::time::Duration;

use crate::types::{CodeSubmission, ReviewResult};

/// A single AI review backend.
#[async_trait]
pub trait ReviewProvider: Send + Sync {
    /// Short backend identifier used in logs.
    fn name(&self) -> &str;

    /// Produce a review for the submission, or `None` after exhausting the
    /// backend's retry and model-fallback policy. Never fails loudly.
    async fn request_review(&self, submission: &CodeSubmission) -> Option<ReviewResult>;
}

/// Connection settings shared by the concrete adapters.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Bearer credential for the backend
    pub api_key: String,
    /// API root, without a trailing slash
    pub base_url: String,
    /// Model tried first
    pub primary_model: String,
    /// Smaller/cheaper model tried when the primary is unavailable
    pub fallback_model: String,
    /// Retry policy applied per model
    pub retry: RetryPolicy,
    /// HTTP client timeout
    pub timeout: Duration,
}

/// User agent string for provider requests.
pub(crate) fn user_agent() -> String {
    format!("review-engine/{} (rust)", crate::VERSION)
}
