//! Review Engine - AI-powered code review service.

use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use review_engine_rs::config::{Args, Config};
use review_engine_rs::error::Result;
use review_engine_rs::gitlab::GitLabClient;
use review_engine_rs::http::{self, AppState};
use review_engine_rs::metrics::ServiceMetrics;
use review_engine_rs::pipeline::ReviewOrchestrator;
use review_engine_rs::provider::{
    HuggingFaceProvider, OpenAiProvider, ProviderSettings, RetryPolicy, ReviewProvider,
};
use review_engine_rs::storage::{InMemoryStore, ReviewStore};
use review_engine_rs::VERSION;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // Build configuration from args
    let config: Config = args.into();

    info!("Review Engine v{}", VERSION);
    info!("Port: {}", config.port);

    let retry = RetryPolicy {
        max_attempts: config.retry_budget,
        delay: config.retry_delay(),
    };

    // Providers are tried in declaration order; fallback is an ordered
    // policy, not a race.
    let mut providers: Vec<Arc<dyn ReviewProvider>> = Vec::new();

    if let Some(api_key) = config.openai_api_key.clone() {
        let provider = OpenAiProvider::new(ProviderSettings {
            api_key,
            base_url: config.openai_api_url.clone(),
            primary_model: config.openai_model.clone(),
            fallback_model: config.openai_fallback_model.clone(),
            retry: retry.clone(),
            timeout: config.request_timeout(),
        })?;
        providers.push(Arc::new(provider));
        info!("OpenAI provider enabled ({})", config.openai_model);
    }

    if let Some(api_key) = config.hf_api_token.clone() {
        let provider = HuggingFaceProvider::new(ProviderSettings {
            api_key,
            base_url: config.hf_api_url.clone(),
            primary_model: config.hf_model.clone(),
            fallback_model: config.hf_fallback_model.clone(),
            retry,
            timeout: config.request_timeout(),
        })?;
        providers.push(Arc::new(provider));
        info!("Hugging Face provider enabled ({})", config.hf_model);
    }

    if providers.is_empty() {
        warn!("no provider credentials configured; reviews will use static analysis only");
    }

    let metrics = ServiceMetrics::new();
    let orchestrator = Arc::new(ReviewOrchestrator::new(
        providers,
        config.gitlab_base_url.clone(),
        metrics.clone(),
    ));
    let store: Arc<dyn ReviewStore> = Arc::new(InMemoryStore::new());

    let gitlab = match config.gitlab_token.clone() {
        Some(token) => {
            info!("GitLab comment posting enabled ({})", config.gitlab_base_url);
            Some(Arc::new(GitLabClient::new(
                config.gitlab_base_url.clone(),
                token,
                config.request_timeout(),
            )?))
        }
        None => None,
    };

    let state = AppState::new(orchestrator, store, gitlab, metrics);
    http::start_server(&config, state).await
}
