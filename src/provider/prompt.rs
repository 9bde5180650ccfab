//! Review prompt construction.
//!
//! The prompt embeds the submitted code fenced with its language tag, the full
//! canonical JSON result schema, and an emphasis directive derived from the
//! requested review type. The model is instructed to emit only the JSON
//! object: downstream parsing has no structural fallback for prose-wrapped
//! answers beyond a best-effort markdown-fence strip.

use crate::types::{CodeSubmission, ReviewType};

/// The canonical result schema, shown to the model verbatim.
const RESULT_SCHEMA: &str = r#"{
  "metrics": {
    "overall": {"grade": "A+".."F", "score": 0-100},
    "maintainability": {"grade": "A+".."F", "score": 0-100},
    "performance": {"grade": "A+".."F", "score": 0-100},
    "security": {"grade": "A+".."F", "score": 0-100}
  },
  "comments": [
    {
      "line": <1-based line number>,
      "text": "<explanation of the issue>",
      "type": "error" | "warning" | "suggestion" | "info",
      "suggestion": "<replacement code for the line, optional>"
    }
  ],
  "improvedCode": "<full improved version of the file, optional>",
  "keyImprovements": ["<short improvement headline>", "... at most 6"],
  "issues": {
    "critical": <count of type=error comments>,
    "warnings": <count of type=warning comments>,
    "info": <count of type=info or type=suggestion comments>,
    "types": [
      {"name": "<issue category>", "description": "<one sentence>", "severity": "high" | "medium" | "low"}
    ]
  }
}"#;

/// Emphasis directive for a review type.
fn directive(review_type: ReviewType) -> &'static str {
    match review_type {
        ReviewType::Comprehensive => {
            "Perform a comprehensive review covering correctness, maintainability, \
             performance, and security."
        }
        ReviewType::SyntaxOnly => {
            "Focus only on syntax, style, and likely bugs. Do not comment on \
             architecture, performance, or security."
        }
        ReviewType::SecurityFocus => {
            "Focus the review on security: unsafe handling of input, injection risks, \
             secrets in code, and error-information disclosure."
        }
        ReviewType::PerformanceFocus => {
            "Focus the review on performance: algorithmic complexity, redundant work, \
             and unnecessary allocations."
        }
    }
}

/// Build the full review prompt for a submission.
pub fn build_prompt(submission: &CodeSubmission) -> String {
    format!(
        r#"You are a senior software engineer reviewing a code snippet.

## Code ({language})
```{tag}
{code}
```

## Instructions
{directive}

Line numbers in your comments must refer to the snippet above, starting at 1.
Grades and scores must be consistent: a higher score means an equal or better grade.

Respond with ONLY a JSON object matching EXACTLY this schema. No prose before
or after the JSON:

{schema}"#,
        language = submission.language,
        tag = submission.language.to_lowercase(),
        code = submission.code,
        directive = directive(submission.review_type),
        schema = RESULT_SCHEMA,
    )
}
