//! Utility modules supporting citation lookups.
//!
//! - [`HttpClient`]: shared reqwest client with timeouts and a crate user agent
//! - [`RetryConfig`]: attempt budget and delay for lookups
//! - [`with_retry`]: execute an operation with automatic retry on transient errors
//!
//! # Retry
//!
//! ```rust,no_run
//! use citeas_ack::sources::SourceError;
//! use citeas_ack::utils::{with_retry, RetryConfig, RetryResult};
//!
//! # async fn fetch_data() -> Result<String, SourceError> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() {
//! let config = RetryConfig::default().max_attempts(3);
//! if let RetryResult::Success(data, attempts) = with_retry(config, fetch_data).await {
//!     println!("{} after {} attempt(s)", data, attempts);
//! }
//! # }
//! ```

mod http;
mod retry;

pub use http::{HttpClient, DEFAULT_TIMEOUT};
pub use retry::{
    with_retry, RetryConfig, RetryResult, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY,
};
