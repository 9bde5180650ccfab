//! End-to-end pipeline tests.
//!
//! These drive the orchestrator through scripted providers, without touching
//! the network, and verify the observable guarantees of the review pipeline:
//! the bucket-count invariant, comment ordering, merge behavior, and the
//! deterministic static-only fallback.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use review_engine_rs::metrics::ServiceMetrics;
use review_engine_rs::pipeline::ReviewOrchestrator;
use review_engine_rs::provider::ReviewProvider;
use review_engine_rs::types::{
    CodeComment, CodeSubmission, CommentType, IssuesSummary, Metrics, MetricScore, ReviewResult,
    ReviewType,
};

/// Provider that always returns a fixed, pre-built result.
struct ScriptedProvider {
    name: &'static str,
    result: Option<ReviewResult>,
    calls: AtomicU32,
}

impl ScriptedProvider {
    fn succeeding(name: &'static str, result: ReviewResult) -> Self {
        Self {
            name,
            result: Some(result),
            calls: AtomicU32::new(0),
        }
    }

    fn failing(name: &'static str) -> Self {
        Self {
            name,
            result: None,
            calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl ReviewProvider for ScriptedProvider {
    fn name(&self) -> &str {
        self.name
    }

    async fn request_review(&self, _submission: &CodeSubmission) -> Option<ReviewResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

fn ai_result(comments: Vec<CodeComment>) -> ReviewResult {
    let mut issues = IssuesSummary::default();
    issues.recount(&comments);
    ReviewResult {
        id: String::new(),
        metrics: Metrics {
            overall: MetricScore::new("B+", 85),
            maintainability: MetricScore::new("B", 82),
            performance: MetricScore::new("B-", 78),
            security: MetricScore::new("A-", 90),
        },
        comments,
        improved_code: Some("const x = 1;\n".to_string()),
        key_improvements: Some(vec!["Use const".to_string()]),
        issues,
        gitlab_integration: None,
        created_at: String::new(),
    }
}

fn orchestrator(providers: Vec<Arc<dyn ReviewProvider>>) -> ReviewOrchestrator {
    ReviewOrchestrator::new(
        providers,
        "https://gitlab.example.com".to_string(),
        ServiceMetrics::new(),
    )
}

fn js_submission() -> CodeSubmission {
    CodeSubmission::new(
        "JavaScript",
        ReviewType::Comprehensive,
        "var x = 1;\nif (x == 1) { console.log(x); }",
    )
}

fn bucket_counts(result: &ReviewResult) -> (u32, u32, u32) {
    let errors = result
        .comments
        .iter()
        .filter(|c| c.comment_type == CommentType::Error)
        .count() as u32;
    let warnings = result
        .comments
        .iter()
        .filter(|c| c.comment_type == CommentType::Warning)
        .count() as u32;
    let info = result
        .comments
        .iter()
        .filter(|c| matches!(c.comment_type, CommentType::Info | CommentType::Suggestion))
        .count() as u32;
    (errors, warnings, info)
}

#[tokio::test]
async fn bucket_counts_match_comments_after_merge() {
    let ai = ai_result(vec![
        CodeComment::new(2, "Model thinks the comparison is risky", CommentType::Warning),
        CodeComment::new(1, "Model note", CommentType::Info),
    ]);
    let provider = Arc::new(ScriptedProvider::succeeding("scripted", ai));
    let orch = orchestrator(vec![provider]);

    let result = orch.review(&js_submission()).await;

    let (errors, warnings, info) = bucket_counts(&result);
    assert_eq!(result.issues.critical, errors);
    assert_eq!(result.issues.warnings, warnings);
    assert_eq!(result.issues.info, info);
    assert_eq!(result.issues.total(), errors + warnings + info);
}

#[tokio::test]
async fn comments_sorted_ascending_by_line() {
    let ai = ai_result(vec![
        CodeComment::new(2, "second line note", CommentType::Info),
        CodeComment::new(1, "first line note", CommentType::Info),
    ]);
    let provider = Arc::new(ScriptedProvider::succeeding("scripted", ai));
    let orch = orchestrator(vec![provider]);

    let result = orch.review(&js_submission()).await;

    let lines: Vec<u32> = result.comments.iter().map(|c| c.line).collect();
    let mut sorted = lines.clone();
    sorted.sort();
    assert_eq!(lines, sorted);
    assert!(!lines.is_empty());
}

#[tokio::test]
async fn merge_drops_byte_identical_static_finding() {
    // The AI result already carries the analyzer's exact warning text on the
    // same line: the merged result must contain it exactly once.
    let duplicate_text = "Avoid console.log statements in production code";
    let ai = ai_result(vec![CodeComment::new(2, duplicate_text, CommentType::Warning)]);
    let provider = Arc::new(ScriptedProvider::succeeding("scripted", ai));
    let orch = orchestrator(vec![provider]);

    let result = orch.review(&js_submission()).await;

    let occurrences = result
        .comments
        .iter()
        .filter(|c| c.line == 2 && c.text == duplicate_text)
        .count();
    assert_eq!(occurrences, 1);
}

#[tokio::test]
async fn merge_adds_static_findings_to_buckets() {
    // AI result with no comments at all: every static finding lands in the
    // merged result and is counted exactly once.
    let ai = ai_result(Vec::new());
    let before = ai.issues.clone();
    let provider = Arc::new(ScriptedProvider::succeeding("scripted", ai));
    let orch = orchestrator(vec![provider]);

    let result = orch.review(&js_submission()).await;

    // The JS submission yields 2 warnings (console.log, ==) and 1 suggestion.
    assert_eq!(result.issues.warnings, before.warnings + 2);
    assert_eq!(result.issues.info, before.info + 1);
    assert_eq!(result.issues.critical, before.critical);
    assert!(result.improved_code.is_some());
}

#[tokio::test]
async fn failed_provider_falls_through_to_next() {
    let first = Arc::new(ScriptedProvider::failing("first"));
    let second = Arc::new(ScriptedProvider::succeeding(
        "second",
        ai_result(vec![CodeComment::new(1, "note", CommentType::Info)]),
    ));
    let orch = orchestrator(vec![first.clone(), second.clone()]);

    let result = orch.review(&js_submission()).await;

    assert_eq!(first.calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    // The AI metrics survive, so this was not the static fallback.
    assert_eq!(result.metrics.security.grade, "A-");
}

#[tokio::test]
async fn all_providers_failing_yields_fixed_threshold_grades() {
    let orch = orchestrator(vec![
        Arc::new(ScriptedProvider::failing("first")) as Arc<dyn ReviewProvider>,
        Arc::new(ScriptedProvider::failing("second")) as Arc<dyn ReviewProvider>,
    ]);

    let result = orch.review(&js_submission()).await;

    let pair = (
        result.metrics.overall.grade.as_str(),
        result.metrics.overall.score,
    );
    let fixed_pairs = [("A-", 90), ("B+", 85), ("B-", 80), ("D+", 65), ("C", 70)];
    assert!(fixed_pairs.contains(&pair), "unexpected pair {:?}", pair);

    assert_eq!(result.metrics.performance.grade, "C+");
    assert_eq!(result.metrics.performance.score, 75);
    assert_eq!(result.metrics.security.grade, "C");
    assert_eq!(result.metrics.security.score, 70);
}

#[tokio::test]
async fn javascript_scenario_with_all_providers_failing() {
    let orch = orchestrator(vec![
        Arc::new(ScriptedProvider::failing("first")) as Arc<dyn ReviewProvider>,
        Arc::new(ScriptedProvider::failing("second")) as Arc<dyn ReviewProvider>,
    ]);

    let result = orch.review(&js_submission()).await;

    let var_finding = result
        .comments
        .iter()
        .find(|c| c.line == 1 && c.comment_type == CommentType::Suggestion)
        .expect("var finding");
    assert_eq!(var_finding.suggestion.as_deref(), Some("const x = 1;"));

    let eq_finding = result
        .comments
        .iter()
        .find(|c| c.line == 2 && c.text.contains("strict equality"))
        .expect("loose equality finding");
    assert_eq!(eq_finding.comment_type, CommentType::Warning);

    assert!(result
        .comments
        .iter()
        .any(|c| c.line == 2
            && c.comment_type == CommentType::Warning
            && c.text.contains("console.log")));

    // 0 errors and 2 warnings: the second fixed threshold applies.
    assert_eq!(result.metrics.overall.grade, "B+");
    assert_eq!(result.metrics.overall.score, 85);
    assert!(result
        .issues
        .types
        .iter()
        .any(|t| t.name == "Static Analysis Only"));
}

#[tokio::test]
async fn empty_code_produces_single_error_finding() {
    let orch = orchestrator(Vec::new());
    let submission = CodeSubmission::new("JavaScript", ReviewType::Comprehensive, "   \n  ");

    let result = orch.review(&submission).await;

    assert_eq!(result.comments.len(), 1);
    assert_eq!(result.comments[0].line, 1);
    assert_eq!(result.comments[0].text, "Code is empty");
    assert_eq!(result.comments[0].comment_type, CommentType::Error);
}

#[tokio::test]
async fn review_result_is_stamped_and_serializable() {
    let orch = orchestrator(Vec::new());
    let result = orch.review(&js_submission()).await;

    assert!(!result.id.is_empty());
    assert!(!result.created_at.is_empty());

    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"keyImprovements\""));
    assert!(json.contains("\"issues\""));
}
