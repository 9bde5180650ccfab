//! HTTP server for the review API.
//!
//! Thin plumbing around the pipeline: request-shape validation happens here,
//! before the core is invoked; the core itself assumes a well-formed
//! submission and never fails.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::gitlab::GitLabClient;
use crate::metrics::ServiceMetrics;
use crate::pipeline::ReviewOrchestrator;
use crate::storage::ReviewStore;
use crate::types::CodeSubmission;
use crate::MAX_CODE_SIZE;

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<ReviewOrchestrator>,
    store: Arc<dyn ReviewStore>,
    gitlab: Option<Arc<GitLabClient>>,
    metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(
        orchestrator: Arc<ReviewOrchestrator>,
        store: Arc<dyn ReviewStore>,
        gitlab: Option<Arc<GitLabClient>>,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            orchestrator,
            store,
            gitlab,
            metrics,
        }
    }
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/reviews", post(create_review).get(list_reviews))
        .route("/api/reviews/{id}", get(get_review))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn start_server(config: &Config, state: AppState) -> Result<()> {
    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| crate::Error::HttpServer(e.to_string()))?;

    Ok(())
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "metrics": state.metrics.snapshot(),
    }))
}

/// Reject submissions the pipeline is not obligated to handle.
fn validate_submission(submission: &CodeSubmission) -> std::result::Result<(), &'static str> {
    if submission.language.trim().is_empty() {
        return Err("language must not be empty");
    }
    if submission.code.is_empty() {
        return Err("code must not be empty");
    }
    if submission.code.len() > MAX_CODE_SIZE {
        return Err("code exceeds the maximum submission size");
    }
    Ok(())
}

/// Create a review for a submitted code snippet.
async fn create_review(
    State(state): State<AppState>,
    Json(submission): Json<CodeSubmission>,
) -> impl IntoResponse {
    if let Err(message) = validate_submission(&submission) {
        state.metrics.inc_rejected();
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": message })),
        )
            .into_response();
    }

    state.metrics.inc_reviews();
    let mut result = state.orchestrator.review(&submission).await;

    // Posting comments to the merge request is the collaborator's job, after
    // the review is finished; a posting failure never fails the review.
    if let (Some(client), Some(integration)) = (&state.gitlab, result.gitlab_integration.clone())
    {
        match client
            .post_review_comments(&integration, &result.comments)
            .await
        {
            Ok(note_ids) => {
                if let Some(block) = result.gitlab_integration.as_mut() {
                    block.posted_comment_ids = note_ids;
                }
            }
            Err(e) => warn!(error = %e, "failed to post review comments to GitLab"),
        }
    }

    if let Err(e) = state.store.create_review(&submission, &result).await {
        warn!(error = %e, "failed to persist review");
    }

    (StatusCode::OK, Json(result)).into_response()
}

/// Fetch a stored review by id.
async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.store.get_review(&id).await {
        Some(stored) => (StatusCode::OK, Json(serde_json::to_value(stored).unwrap_or_default()))
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("Review not found: {}", id) })),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<usize>,
}

/// List recent reviews, newest first.
async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(20).min(100);
    let reviews = state.store.list_reviews(limit).await;
    Json(serde_json::json!({ "reviews": reviews }))
}
