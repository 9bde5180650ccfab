//! Provider response parsing and repair.
//!
//! The happy path strips a markdown fence, parses the body as JSON, and
//! validates the parsed object against the canonical schema; validation
//! failure is treated identically to parse failure. Backends known to return
//! prose or bare code instead of JSON additionally get a best-effort
//! synthetic extraction ([`extract_from_text`]) that classifies lines by
//! keyword. The synthetic path is heuristic and lossy on purpose: its
//! contract is degraded output, not accurate classification.

use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{
    CodeComment, CommentType, IssueSeverity, IssueType, Metrics, MetricScore, ReviewResult,
};
use crate::MAX_KEY_IMPROVEMENTS;

/// Letter grades accepted in metric scores.
const VALID_GRADES: [&str; 13] = [
    "A+", "A", "A-", "B+", "B", "B-", "C+", "C", "C-", "D+", "D", "D-", "F",
];

/// Strip a single leading/trailing markdown code fence, if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string on the opening fence line.
    let Some((_, body)) = rest.split_once('\n') else {
        return trimmed;
    };
    match body.rfind("```") {
        Some(pos) => body[..pos].trim(),
        None => body.trim(),
    }
}

/// Parse a raw model response into a validated [`ReviewResult`].
///
/// `line_count` is the number of physical lines in the submitted code;
/// comments attributed outside `1..=line_count` are dropped during repair.
pub fn parse_review(raw: &str, line_count: u32) -> Result<ReviewResult> {
    let body = strip_code_fence(raw);
    let mut result: ReviewResult = serde_json::from_str(body)
        .map_err(|e| Error::MalformedResponse(format!("response is not valid JSON: {}", e)))?;
    repair(&mut result, line_count)?;
    Ok(result)
}

/// Validate metric shapes and repair the variable parts of a parsed result.
fn repair(result: &mut ReviewResult, line_count: u32) -> Result<()> {
    for (name, metric) in [
        ("overall", &result.metrics.overall),
        ("maintainability", &result.metrics.maintainability),
        ("performance", &result.metrics.performance),
        ("security", &result.metrics.security),
    ] {
        if !VALID_GRADES.contains(&metric.grade.as_str()) {
            return Err(Error::MalformedResponse(format!(
                "invalid {} grade: {:?}",
                name, metric.grade
            )));
        }
        if metric.score > 100 {
            return Err(Error::MalformedResponse(format!(
                "invalid {} score: {}",
                name, metric.score
            )));
        }
    }

    result
        .comments
        .retain(|c| c.line >= 1 && c.line <= line_count);

    if let Some(improvements) = result.key_improvements.as_mut() {
        improvements.truncate(MAX_KEY_IMPROVEMENTS);
        if improvements.is_empty() {
            result.key_improvements = None;
        }
    }

    // Never trust model-supplied bucket counts.
    let comments = std::mem::take(&mut result.comments);
    result.issues.recount(&comments);
    result.comments = comments;

    Ok(())
}

/// Neutral metric block for results recovered from free text. A prose
/// response carries no scoring signal.
fn neutral_metrics() -> Metrics {
    Metrics {
        overall: MetricScore::new("C+", 75),
        maintainability: MetricScore::new("C+", 75),
        performance: MetricScore::new("C+", 75),
        security: MetricScore::new("C", 70),
    }
}

/// Token set indicating the response is source code rather than review prose.
fn looks_like_code(text: &str) -> bool {
    ["import ", "function ", "class ", "const ", "let "]
        .iter()
        .any(|token| text.contains(token))
}

/// Classify a free-text line into a comment type by keyword.
fn classify_line(line: &str) -> CommentType {
    let lower = line.to_lowercase();
    if ["error", "critical", "severe"].iter().any(|k| lower.contains(k)) {
        CommentType::Error
    } else if ["warning", "caution", "consider"].iter().any(|k| lower.contains(k)) {
        CommentType::Warning
    } else if ["suggest", "recommend", "improvement"].iter().any(|k| lower.contains(k)) {
        CommentType::Suggestion
    } else {
        CommentType::Info
    }
}

/// Best-effort extraction of a degraded result from a non-JSON response.
///
/// If the text looks like source code, the entire text becomes the
/// `improvedCode` field. Otherwise each non-empty line becomes a comment,
/// classified by keyword, attributed to its position in the response text.
pub fn extract_from_text(raw: &str) -> Result<ReviewResult> {
    let text = strip_code_fence(raw);
    if text.trim().is_empty() {
        return Err(Error::MalformedResponse(
            "response body is empty".to_string(),
        ));
    }

    let degraded_flag = IssueType {
        name: "Unstructured AI Response".to_string(),
        description: "The model returned free text; findings were recovered heuristically"
            .to_string(),
        severity: IssueSeverity::Low,
    };

    if looks_like_code(text) {
        debug!("response looks like source code, using it as improvedCode");
        let mut result = ReviewResult {
            id: String::new(),
            metrics: neutral_metrics(),
            comments: Vec::new(),
            improved_code: Some(text.to_string()),
            key_improvements: None,
            issues: Default::default(),
            gitlab_integration: None,
            created_at: String::new(),
        };
        result.issues.types.push(degraded_flag);
        return Ok(result);
    }

    let mut comments = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let content = line.trim();
        if content.is_empty() {
            continue;
        }
        comments.push(CodeComment::new(
            (idx + 1) as u32,
            content,
            classify_line(content),
        ));
    }

    if comments.is_empty() {
        return Err(Error::MalformedResponse(
            "no usable content in response".to_string(),
        ));
    }

    let mut result = ReviewResult {
        id: String::new(),
        metrics: neutral_metrics(),
        comments,
        improved_code: None,
        key_improvements: None,
        issues: Default::default(),
        gitlab_integration: None,
        created_at: String::new(),
    };
    let comments = std::mem::take(&mut result.comments);
    result.issues.recount(&comments);
    result.comments = comments;
    result.issues.types.push(degraded_flag);
    Ok(result)
}
