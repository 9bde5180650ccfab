//! Review persistence collaborator.
//!
//! The pipeline hands finished results here and never reads them back; the
//! store exists for the history endpoints. The default implementation keeps
//! reviews in process memory.

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{CodeSubmission, ReviewResult, ReviewType};

/// A stored review: the result plus the submission metadata it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReview {
    pub id: String,
    pub language: String,
    pub review_type: ReviewType,
    pub result: ReviewResult,
    pub created_at: String,
}

/// Persistence seam for finished reviews.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Persist a finished review with its submission metadata.
    async fn create_review(
        &self,
        submission: &CodeSubmission,
        result: &ReviewResult,
    ) -> Result<()>;

    /// Fetch a review by id.
    async fn get_review(&self, id: &str) -> Option<StoredReview>;

    /// List recent reviews, newest first.
    async fn list_reviews(&self, limit: usize) -> Vec<StoredReview>;
}

/// In-memory store backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    reviews: DashMap<String, StoredReview>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewStore for InMemoryStore {
    async fn create_review(
        &self,
        submission: &CodeSubmission,
        result: &ReviewResult,
    ) -> Result<()> {
        let stored = StoredReview {
            id: result.id.clone(),
            language: submission.language.clone(),
            review_type: submission.review_type,
            result: result.clone(),
            created_at: result.created_at.clone(),
        };
        self.reviews.insert(stored.id.clone(), stored);
        Ok(())
    }

    async fn get_review(&self, id: &str) -> Option<StoredReview> {
        self.reviews.get(id).map(|entry| entry.value().clone())
    }

    async fn list_reviews(&self, limit: usize) -> Vec<StoredReview> {
        let mut reviews: Vec<StoredReview> =
            self.reviews.iter().map(|entry| entry.value().clone()).collect();
        // RFC3339 timestamps sort lexicographically.
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        reviews.truncate(limit);
        reviews
    }
}
