//! GitLab merge-request collaborator.
//!
//! Two responsibilities, both outside the review pipeline proper: building
//! the merge-request metadata block attached to a result, and posting the
//! result's comments to the merge request as discussion notes. The pipeline
//! only ever calls [`merge_request_link`]; posting is driven by the HTTP
//! layer after the review is finished.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{CodeComment, CodeSubmission, CommentType, GitLabIntegration};

/// Build the metadata block linking a review to a merge request.
///
/// Returns `None` unless the submission carries both a project id and a
/// merge-request iid.
pub fn merge_request_link(
    submission: &CodeSubmission,
    base_url: &str,
) -> Option<GitLabIntegration> {
    let project_id = submission.project_id?;
    let merge_request_iid = submission.merge_request_iid?;

    Some(GitLabIntegration {
        project_id,
        merge_request_iid,
        commit_sha: submission.commit_sha.clone(),
        review_url: format!(
            "{}/projects/{}/merge_requests/{}",
            base_url.trim_end_matches('/'),
            project_id,
            merge_request_iid
        ),
        posted_comment_ids: Vec::new(),
    })
}

/// Client for posting review comments to GitLab.
#[derive(Debug, Clone)]
pub struct GitLabClient {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Deserialize)]
struct NoteResponse {
    id: u64,
}

impl GitLabClient {
    /// Create a new client against a GitLab instance.
    pub fn new(base_url: String, token: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(crate::provider::user_agent())
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Post each review comment as a note on the linked merge request.
    /// Returns the ids of the notes created.
    pub async fn post_review_comments(
        &self,
        integration: &GitLabIntegration,
        comments: &[CodeComment],
    ) -> Result<Vec<u64>> {
        let url = format!(
            "{}/api/v4/projects/{}/merge_requests/{}/notes",
            self.base_url.trim_end_matches('/'),
            integration.project_id,
            integration.merge_request_iid
        );

        let mut note_ids = Vec::with_capacity(comments.len());
        for comment in comments {
            let response = self
                .client
                .post(&url)
                .header("PRIVATE-TOKEN", &self.token)
                .json(&json!({ "body": format_note(comment) }))
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::GitLab {
                    status: status.as_u16(),
                    message: body,
                });
            }

            let note: NoteResponse = response.json().await.map_err(|e| Error::GitLab {
                status: 0,
                message: format!("invalid note response: {}", e),
            })?;
            note_ids.push(note.id);
        }

        debug!(count = note_ids.len(), "posted review comments to GitLab");
        Ok(note_ids)
    }
}

/// Render a comment as a markdown note body.
fn format_note(comment: &CodeComment) -> String {
    let label = match comment.comment_type {
        CommentType::Error => "Error",
        CommentType::Warning => "Warning",
        CommentType::Suggestion => "Suggestion",
        CommentType::Info => "Info",
    };

    let mut body = format!("**Line {}** ({}): {}", comment.line, label, comment.text);
    if let Some(suggestion) = &comment.suggestion {
        body.push_str(&format!("\n\n```suggestion\n{}\n```", suggestion));
    }
    body
}
