//! Result normalizer.
//!
//! Merges AI-sourced findings with the pattern analyzer's findings into one
//! consistent result. Deduplication is an exact-text match per line: when both
//! sources flag the same issue verbatim only one comment survives, but
//! near-duplicate phrasing from both sources is kept by design.

use std::collections::{HashMap, HashSet};

use crate::types::{CodeComment, ReviewResult};

/// Merge static findings into an AI result.
///
/// Static findings are appended unless an AI comment on the same line carries
/// byte-identical text. Bucket counts are recomputed from the merged comment
/// list (a stale model-supplied sum is never trusted), and comments are sorted
/// ascending by line; the sort is stable, so AI-sourced comments stay ahead of
/// static ones on the same line.
pub fn merge(mut ai: ReviewResult, static_findings: Vec<CodeComment>) -> ReviewResult {
    let mut seen: HashMap<u32, HashSet<String>> = HashMap::new();
    for comment in &ai.comments {
        seen.entry(comment.line)
            .or_default()
            .insert(comment.text.clone());
    }

    for finding in static_findings {
        let duplicate = seen
            .get(&finding.line)
            .is_some_and(|texts| texts.contains(&finding.text));
        if !duplicate {
            ai.comments.push(finding);
        }
    }

    let comments = std::mem::take(&mut ai.comments);
    ai.issues.recount(&comments);
    ai.comments = comments;
    ai.comments.sort_by_key(|c| c.line);

    ai
}
