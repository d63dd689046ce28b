//! Timeline Providers
//!
//! The generative service that produces the dataset sits behind the
//! [`TimelineProvider`] trait so the application and tests never depend on a
//! live network. One implementation exists: [`gemini::GeminiProvider`].

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Timeline;

pub use gemini::{GeminiConfig, GeminiProvider};

/// Errors from one acquisition attempt.
///
/// All variants collapse to the same fixed user-facing message at the UI
/// boundary; the distinction exists for logging and for tests.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No credential was available; checked before any network call
    #[error("no API key configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    /// Network-level failure: connection refused, timeout, non-success status
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Transport succeeded but the provider returned no content text
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// Content text was not valid JSON or violated the timeline schema
    #[error("response did not match the timeline schema: {0}")]
    Parse(String),
}

/// Result of one acquisition attempt
pub type FetchOutcome = Result<Timeline, ProviderError>;

/// A generative-content service that can produce one timeline dataset.
///
/// Strictly single-shot per call: no retry, backoff, or partial-result
/// handling happens inside an implementation.
#[async_trait]
pub trait TimelineProvider: Send + Sync {
    /// Provider name for logging (e.g. "Gemini")
    fn name(&self) -> &str;

    /// Issue one request and validate the response against the schema
    async fn request_timeline(&self) -> FetchOutcome;
}
