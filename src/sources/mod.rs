//! Citation sources.
//!
//! A [`CitationSource`] answers one question: "what does the citation service
//! say about this package?". It returns the raw JSON product record and leaves
//! style selection to [`crate::fetcher`], so structural problems in a record
//! can be told apart from transport problems.
//!
//! - [`CiteasSource`]: the public CiteAs API over HTTP
//! - [`MockSource`]: scripted responses for tests

mod citeas;
pub mod mock;

pub use citeas::{CiteasSource, CITEAS_API_BASE, DEFAULT_CONTACT_EMAIL};
pub use mock::MockSource;

use async_trait::async_trait;

/// Interface for anything that can look up a package's citation record.
#[async_trait]
pub trait CitationSource: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Perform a single lookup. No retrying happens at this level.
    async fn lookup(&self, package: &str) -> Result<serde_json::Value, SourceError>;
}

/// Errors that can occur when talking to a citation source
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The body was not valid JSON
    #[error("Parse error: {0}")]
    Parse(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Other API failure
    #[error("API error: {0}")]
    Api(String),
}

impl SourceError {
    /// Whether another attempt could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Network(_) | SourceError::Parse(_) => true,
            SourceError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            SourceError::Api(_) => false,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}
