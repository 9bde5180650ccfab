//! Retry and in-provider model fallback.
//!
//! Rate-limit signals are retried on the same model with a constant delay
//! between attempts (a fixed wait, not exponential backoff). Quota and other
//! permanent errors skip straight to the provider's secondary model with a
//! fresh attempt budget. An unusable (malformed beyond repair) response fails
//! the whole provider: a degraded model answer will not improve on retry.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::Error;
use crate::types::ReviewResult;

/// Retry policy applied per model.
///
/// `max_attempts` counts TOTAL attempts on one model, the first attempt
/// included: a budget of 2 means one initial attempt plus one retry before
/// falling back to the secondary model.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts allowed per model
    pub max_attempts: u32,
    /// Constant wait between attempts after a rate-limit signal
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay: Duration::from_millis(1500),
        }
    }
}

/// Run `attempt` against the primary model, then the fallback model, under
/// the retry policy. Returns the first successful result, or `None` once both
/// models are exhausted.
pub async fn request_with_model_fallback<F, Fut>(
    policy: &RetryPolicy,
    provider: &str,
    primary: &str,
    fallback: &str,
    mut attempt: F,
) -> Option<ReviewResult>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = crate::Result<ReviewResult>>,
{
    for model in [primary, fallback] {
        let mut tries = 0u32;
        loop {
            tries += 1;
            match attempt(model.to_string()).await {
                Ok(result) => {
                    debug!(provider, model, tries, "model produced a review");
                    return Some(result);
                }
                Err(e) if e.is_rate_limit() => {
                    if tries >= policy.max_attempts {
                        warn!(provider, model, tries, "rate-limit budget exhausted");
                        break;
                    }
                    debug!(provider, model, tries, "rate limited, retrying after delay");
                    sleep(policy.delay).await;
                }
                Err(e) if e.is_quota() => {
                    warn!(provider, model, error = %e, "quota exhausted, skipping retries");
                    break;
                }
                Err(Error::MalformedResponse(msg)) => {
                    warn!(provider, model, message = %msg, "unusable model response");
                    return None;
                }
                Err(e) => {
                    warn!(provider, model, error = %e, "model request failed");
                    break;
                }
            }
        }
    }

    warn!(provider, "all models exhausted");
    None
}
