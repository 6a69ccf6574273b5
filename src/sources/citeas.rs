//! CiteAs citation source implementation.

use async_trait::async_trait;
use std::sync::Arc;

use crate::sources::{CitationSource, SourceError};
use crate::utils::HttpClient;

pub const CITEAS_API_BASE: &str = "https://api.citeas.org";

/// Sent as the `email` query parameter; CiteAs uses it for usage tracking
pub const DEFAULT_CONTACT_EMAIL: &str = "githubActionTest@DanNBullock.com";

/// CiteAs citation source
///
/// Uses the `/product/<name>` endpoint, which returns the same software
/// citation rendered in six styles.
#[derive(Debug, Clone)]
pub struct CiteasSource {
    client: Arc<HttpClient>,
    api_base: String,
    email: String,
}

impl CiteasSource {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client: Arc::new(client),
            api_base: CITEAS_API_BASE.to_string(),
            email: DEFAULT_CONTACT_EMAIL.to_string(),
        }
    }

    /// Point at a different API root (a mock server in tests)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Lookup URL for a package
    pub fn product_url(&self, package: &str) -> String {
        format!(
            "{}/product/{}?email={}",
            self.api_base,
            urlencoding::encode(package),
            urlencoding::encode(&self.email)
        )
    }
}

#[async_trait]
impl CitationSource for CiteasSource {
    fn name(&self) -> &str {
        "CiteAs"
    }

    async fn lookup(&self, package: &str) -> Result<serde_json::Value, SourceError> {
        let url = self.product_url(package);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to query CiteAs: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read CiteAs response: {}", e)))?;

        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| SourceError::Parse(format!("Failed to parse JSON: {}", e)))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
