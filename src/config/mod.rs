//! Configuration management for the Review Engine.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Command-line arguments for the Review Engine server.
#[derive(Parser, Debug, Clone)]
#[command(name = "review-engine")]
#[command(author = "Review Engine Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AI-powered code review service with multi-provider fallback")]
pub struct Args {
    /// HTTP port
    #[arg(short, long, default_value = "8080", env = "REVIEW_ENGINE_PORT")]
    pub port: u16,

    /// Enable debug logging
    #[arg(short, long, env = "REVIEW_ENGINE_DEBUG")]
    pub debug: bool,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,

    /// OpenAI API root
    #[arg(long, default_value = "https://api.openai.com/v1", env = "OPENAI_API_URL")]
    pub openai_api_url: String,

    /// Primary OpenAI model
    #[arg(long, default_value = "gpt-4o", env = "OPENAI_MODEL")]
    pub openai_model: String,

    /// Fallback OpenAI model
    #[arg(long, default_value = "gpt-4o-mini", env = "OPENAI_FALLBACK_MODEL")]
    pub openai_fallback_model: String,

    /// Hugging Face API token
    #[arg(long, env = "HF_API_TOKEN")]
    pub hf_api_token: Option<String>,

    /// Hugging Face inference API root
    #[arg(
        long,
        default_value = "https://api-inference.huggingface.co",
        env = "HF_API_URL"
    )]
    pub hf_api_url: String,

    /// Primary Hugging Face model
    #[arg(
        long,
        default_value = "meta-llama/Llama-3.1-70B-Instruct",
        env = "HF_MODEL"
    )]
    pub hf_model: String,

    /// Fallback Hugging Face model
    #[arg(
        long,
        default_value = "mistralai/Mistral-7B-Instruct-v0.3",
        env = "HF_FALLBACK_MODEL"
    )]
    pub hf_fallback_model: String,

    /// Total attempts allowed per model before falling back
    #[arg(long, default_value = "2", env = "REVIEW_ENGINE_RETRY_BUDGET")]
    pub retry_budget: u32,

    /// Constant wait between rate-limited attempts (milliseconds)
    #[arg(long, default_value = "1500", env = "REVIEW_ENGINE_RETRY_DELAY_MS")]
    pub retry_delay_ms: u64,

    /// Provider request timeout (seconds)
    #[arg(long, default_value = "120", env = "REVIEW_ENGINE_REQUEST_TIMEOUT")]
    pub request_timeout_secs: u64,

    /// GitLab instance root, used for merge-request links
    #[arg(long, default_value = "https://gitlab.com", env = "GITLAB_BASE_URL")]
    pub gitlab_base_url: String,

    /// GitLab token; enables posting review comments to merge requests
    #[arg(long, env = "GITLAB_TOKEN")]
    pub gitlab_token: Option<String>,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP port
    pub port: u16,
    /// Debug mode
    pub debug: bool,
    /// OpenAI credentials and models
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub openai_model: String,
    pub openai_fallback_model: String,
    /// Hugging Face credentials and models
    pub hf_api_token: Option<String>,
    pub hf_api_url: String,
    pub hf_model: String,
    pub hf_fallback_model: String,
    /// Retry knobs
    pub retry_budget: u32,
    pub retry_delay_ms: u64,
    pub request_timeout_secs: u64,
    /// GitLab integration
    pub gitlab_base_url: String,
    pub gitlab_token: Option<String>,
}

impl Config {
    /// Provider request timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Retry delay as a duration.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            port: args.port,
            debug: args.debug,
            openai_api_key: args.openai_api_key,
            openai_api_url: args.openai_api_url,
            openai_model: args.openai_model,
            openai_fallback_model: args.openai_fallback_model,
            hf_api_token: args.hf_api_token,
            hf_api_url: args.hf_api_url,
            hf_model: args.hf_model,
            hf_fallback_model: args.hf_fallback_model,
            retry_budget: args.retry_budget,
            retry_delay_ms: args.retry_delay_ms,
            request_timeout_secs: args.request_timeout_secs,
            gitlab_base_url: args.gitlab_base_url,
            gitlab_token: args.gitlab_token,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            debug: false,
            openai_api_key: None,
            openai_api_url: "https://api.openai.com/v1".to_string(),
            openai_model: "gpt-4o".to_string(),
            openai_fallback_model: "gpt-4o-mini".to_string(),
            hf_api_token: None,
            hf_api_url: "https://api-inference.huggingface.co".to_string(),
            hf_model: "meta-llama/Llama-3.1-70B-Instruct".to_string(),
            hf_fallback_model: "mistralai/Mistral-7B-Instruct-v0.3".to_string(),
            retry_budget: 2,
            retry_delay_ms: 1500,
            request_timeout_secs: 120,
            gitlab_base_url: "https://gitlab.com".to_string(),
            gitlab_token: None,
        }
    }
}
