//! Review orchestration.
//!
//! The orchestrator owns the top-level policy: run the pattern analyzer, try
//! the AI providers strictly in order, merge the first success with the static
//! findings, and synthesize a static-only result when every provider fails.
//! [`ReviewOrchestrator::review`] never fails; every failure mode terminates
//! in a well-formed [`ReviewResult`].

pub mod fallback;
pub mod merge;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::analyzer;
use crate::gitlab;
use crate::metrics::ServiceMetrics;
use crate::provider::ReviewProvider;
use crate::types::{CodeSubmission, ReviewResult};

/// Top-level review pipeline.
pub struct ReviewOrchestrator {
    /// Providers tried strictly in order; never raced, so fallback stays a
    /// deliberate ordered policy and usage is never billed twice.
    providers: Vec<Arc<dyn ReviewProvider>>,
    /// Base URL used to construct merge-request links
    gitlab_base_url: String,
    metrics: Arc<ServiceMetrics>,
}

impl ReviewOrchestrator {
    /// Create a new orchestrator over an ordered provider list.
    pub fn new(
        providers: Vec<Arc<dyn ReviewProvider>>,
        gitlab_base_url: String,
        metrics: Arc<ServiceMetrics>,
    ) -> Self {
        Self {
            providers,
            gitlab_base_url,
            metrics,
        }
    }

    /// Review a submission. Always returns a well-formed result.
    pub async fn review(&self, submission: &CodeSubmission) -> ReviewResult {
        let static_findings =
            match catch_unwind(AssertUnwindSafe(|| analyzer::analyze(submission))) {
                Ok(findings) => findings,
                Err(_) => {
                    // Last resort: the analyzer is pure and should never
                    // panic, but a review is still owed to the caller.
                    error!("pattern analyzer panicked; synthesizing an empty review");
                    self.metrics.inc_static_fallbacks();
                    return self.finalize(fallback::synthesize(Vec::new()), submission);
                }
            };
        debug!(count = static_findings.len(), "static analysis complete");

        let mut ai_result = None;
        for provider in &self.providers {
            self.metrics.inc_provider_attempts();
            match provider.request_review(submission).await {
                Some(result) => {
                    info!(provider = provider.name(), "AI review succeeded");
                    ai_result = Some(result);
                    break;
                }
                None => {
                    warn!(provider = provider.name(), "provider failed, trying next");
                }
            }
        }

        let result = match ai_result {
            Some(ai) => {
                self.metrics.inc_ai_reviews();
                merge::merge(ai, static_findings)
            }
            None => {
                info!("all providers exhausted, synthesizing static-only review");
                self.metrics.inc_static_fallbacks();
                fallback::synthesize(static_findings)
            }
        };

        self.finalize(result, submission)
    }

    /// Stamp identity, timestamp, and merge-request metadata onto a result.
    fn finalize(&self, mut result: ReviewResult, submission: &CodeSubmission) -> ReviewResult {
        result.id = uuid::Uuid::new_v4().to_string();
        result.created_at = chrono::Utc::now().to_rfc3339();
        if submission.has_merge_request() {
            result.gitlab_integration =
                gitlab::merge_request_link(submission, &self.gitlab_base_url);
        }
        result
    }
}
