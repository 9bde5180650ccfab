//! Review Engine - AI-powered code review service.
//!
//! A web service that accepts a source-code snippet and returns a quality
//! review: metric scores, line-level comments, and an improved version of the
//! code. Reviews are produced by external AI providers, validated and repaired
//! into a canonical shape, and merged with findings from a built-in heuristic
//! analyzer.
//!
//! # Architecture
//!
//! The service is layered around one infallible entry point,
//! [`pipeline::ReviewOrchestrator::review`]:
//!
//! 1. **Analyzer** (`analyzer`) - deterministic per-language pattern scanner
//! 2. **Providers** (`provider`) - one adapter per AI backend, with retry and
//!    in-provider model fallback
//! 3. **Pipeline** (`pipeline`) - orchestration, result merging, and the
//!    static-only fallback synthesis
//! 4. **HTTP layer** (`http`) - axum routes wrapping the pipeline
//! 5. **Collaborators** - review storage (`storage`) and GitLab merge-request
//!    integration (`gitlab`)
//!
//! Every failure mode inside the pipeline terminates in a well-formed
//! [`types::ReviewResult`]; a degraded answer is always preferred to no
//! answer.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod gitlab;
pub mod http;
pub mod metrics;
pub mod pipeline;
pub mod provider;
pub mod storage;
pub mod types;

pub use error::{Error, Result};

/// Service version reported on the health endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Maximum accepted submission size (256 KiB of source text).
pub const MAX_CODE_SIZE: usize = 256 * 1024;

/// Maximum number of entries in a result's `keyImprovements` list.
pub const MAX_KEY_IMPROVEMENTS: usize = 6;
