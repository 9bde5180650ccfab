//! Canonical review types.
//!
//! These shapes form the public JSON contract of the service and the schema
//! the AI providers are instructed to emit. Field names on the wire are
//! camelCase (`improvedCode`, `keyImprovements`).

use serde::{Deserialize, Serialize};

/// Kind of review requested for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewType {
    Comprehensive,
    SyntaxOnly,
    SecurityFocus,
    PerformanceFocus,
}

impl Default for ReviewType {
    fn default() -> Self {
        Self::Comprehensive
    }
}

/// A code snippet submitted for review. Immutable input to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSubmission {
    /// Source language as declared by the caller (e.g. "JavaScript")
    pub language: String,
    /// Requested review emphasis
    #[serde(default)]
    pub review_type: ReviewType,
    /// The source text under review
    pub code: String,
    /// GitLab project the snippet belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
    /// Merge request the snippet belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge_request_iid: Option<u64>,
    /// Commit the snippet was taken from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
}

impl CodeSubmission {
    /// Create a plain submission with no source-control linkage.
    pub fn new(language: impl Into<String>, review_type: ReviewType, code: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            review_type,
            code: code.into(),
            project_id: None,
            merge_request_iid: None,
            commit_sha: None,
        }
    }

    /// Whether the submission carries merge-request identifiers.
    pub fn has_merge_request(&self) -> bool {
        self.project_id.is_some() && self.merge_request_iid.is_some()
    }
}

/// Severity class of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentType {
    Error,
    Warning,
    Suggestion,
    Info,
}

/// A single line-attributed finding about the submitted code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeComment {
    /// 1-based line number in the submitted source
    pub line: u32,
    /// Human-readable explanation
    pub text: String,
    /// Severity class
    #[serde(rename = "type")]
    pub comment_type: CommentType,
    /// Replacement code for the offending line, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// File path, for multi-file contexts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl CodeComment {
    pub fn new(line: u32, text: impl Into<String>, comment_type: CommentType) -> Self {
        Self {
            line,
            text: text.into(),
            comment_type,
            suggestion: None,
            file: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// A graded metric with a 0-100 score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricScore {
    /// Letter grade, "A+" through "F"
    pub grade: String,
    /// Numeric score, 0-100
    pub score: u8,
    /// Signed percentage change versus a prior baseline, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<i32>,
}

impl MetricScore {
    pub fn new(grade: impl Into<String>, score: u8) -> Self {
        Self {
            grade: grade.into(),
            score,
            change: None,
        }
    }
}

/// The four metrics every review carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub overall: MetricScore,
    pub maintainability: MetricScore,
    pub performance: MetricScore,
    pub security: MetricScore,
}

/// Severity of an issue-type entry in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    High,
    Medium,
    Low,
}

/// A named issue category surfaced in the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueType {
    pub name: String,
    pub description: String,
    pub severity: IssueSeverity,
}

/// Aggregate issue counts plus categorized issue types.
///
/// Invariant: `critical + warnings + info` equals the number of comments
/// counted under those buckets after merge. The normalizer recomputes the
/// counts whenever it adds findings; a stale sum is never trusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuesSummary {
    /// Count of comments with type `error`
    pub critical: u32,
    /// Count of comments with type `warning`
    pub warnings: u32,
    /// Count of comments with type `info` or `suggestion`
    pub info: u32,
    /// Named issue categories
    #[serde(default)]
    pub types: Vec<IssueType>,
}

impl IssuesSummary {
    /// Recompute all three bucket counts from a comment list.
    pub fn recount(&mut self, comments: &[CodeComment]) {
        self.critical = 0;
        self.warnings = 0;
        self.info = 0;
        for comment in comments {
            self.bump(comment.comment_type);
        }
    }

    /// Increment the bucket a comment type belongs to.
    pub fn bump(&mut self, comment_type: CommentType) {
        match comment_type {
            CommentType::Error => self.critical += 1,
            CommentType::Warning => self.warnings += 1,
            CommentType::Info | CommentType::Suggestion => self.info += 1,
        }
    }

    /// Sum of all three buckets.
    pub fn total(&self) -> u32 {
        self.critical + self.warnings + self.info
    }
}

/// GitLab merge-request linkage attached to a review.
///
/// The pipeline only populates this metadata; posting comments to GitLab is
/// done by the `gitlab` collaborator entirely outside the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitLabIntegration {
    pub project_id: u64,
    pub merge_request_iid: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
    /// URL of the merge request the review applies to
    pub review_url: String,
    /// Identifiers of discussion notes created on GitLab, appended by the
    /// comment-posting collaborator after the review is finished
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub posted_comment_ids: Vec<u64>,
}

/// A complete code review returned to the caller and persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    /// Unique review identifier
    #[serde(default)]
    pub id: String,
    /// Graded metrics
    pub metrics: Metrics,
    /// Line-level findings, ascending by line in the final result
    #[serde(default)]
    pub comments: Vec<CodeComment>,
    /// Full-file improved version of the submitted code, if produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improved_code: Option<String>,
    /// Up to six short improvement headlines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_improvements: Option<Vec<String>>,
    /// Aggregate issue summary
    #[serde(default)]
    pub issues: IssuesSummary,
    /// Merge-request linkage, when the submission carried identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gitlab_integration: Option<GitLabIntegration>,
    /// Creation timestamp (RFC3339)
    #[serde(default)]
    pub created_at: String,
}
