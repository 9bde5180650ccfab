//! Service counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters describing review traffic, surfaced on the health endpoint.
#[derive(Debug, Default)]
pub struct ServiceMetrics {
    /// Reviews served
    pub reviews_total: AtomicU64,
    /// Reviews answered by an AI provider
    pub ai_reviews: AtomicU64,
    /// Reviews answered from static analysis only
    pub static_fallbacks: AtomicU64,
    /// Provider chain attempts
    pub provider_attempts: AtomicU64,
    /// Submissions rejected at the HTTP boundary
    pub rejected_submissions: AtomicU64,
}

/// Point-in-time snapshot of the counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub reviews_total: u64,
    pub ai_reviews: u64,
    pub static_fallbacks: u64,
    pub provider_attempts: u64,
    pub rejected_submissions: u64,
}

impl ServiceMetrics {
    /// Create a new shared counter set.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_reviews(&self) {
        self.reviews_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_ai_reviews(&self) {
        self.ai_reviews.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_static_fallbacks(&self) {
        self.static_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_provider_attempts(&self) {
        self.provider_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rejected(&self) {
        self.rejected_submissions.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            reviews_total: self.reviews_total.load(Ordering::Relaxed),
            ai_reviews: self.ai_reviews.load(Ordering::Relaxed),
            static_fallbacks: self.static_fallbacks.load(Ordering::Relaxed),
            provider_attempts: self.provider_attempts.load(Ordering::Relaxed),
            rejected_submissions: self.rejected_submissions.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_increment() {
        let metrics = ServiceMetrics::new();
        metrics.inc_reviews();
        metrics.inc_reviews();
        metrics.inc_ai_reviews();
        metrics.inc_static_fallbacks();
        metrics.inc_provider_attempts();
        metrics.inc_rejected();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.reviews_total, 2);
        assert_eq!(snapshot.ai_reviews, 1);
        assert_eq!(snapshot.static_fallbacks, 1);
        assert_eq!(snapshot.provider_attempts, 1);
        assert_eq!(snapshot.rejected_submissions, 1);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let metrics = ServiceMetrics::new();
        let json = serde_json::to_string(&metrics.snapshot()).unwrap();
        assert!(json.contains("\"reviewsTotal\":0"));
        assert!(json.contains("\"staticFallbacks\":0"));
    }
}
