//! # citeas-ack
//!
//! Generate a software acknowledgments page from a `requirements.txt`-style
//! manifest, using the [CiteAs](https://citeas.org) API to render a citation
//! for every listed package.
//!
//! ## Architecture
//!
//! - [`manifest`]: locating and parsing the dependency list
//! - [`sources`]: the [`CitationSource`] trait, the CiteAs client and a mock
//! - [`fetcher`]: one package's citation, with retries and style selection
//! - [`bibliography`]: markdown rendering and output
//! - [`pipeline`]: the whole run, manifest to file
//! - [`config`]: layered configuration
//! - [`utils`]: HTTP client and retry helper
//!
//! ```rust,no_run
//! use citeas_ack::config::Config;
//! use citeas_ack::pipeline::{citeas_source, run};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), citeas_ack::Error> {
//! let config = Config::default();
//! let source = citeas_source(&config)?;
//! let report = run(&config, &source).await?;
//! println!("{} citation(s) written", report.citations.len());
//! # Ok(())
//! # }
//! ```

pub mod bibliography;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod manifest;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use error::{Error, Result};
pub use models::{CitationFormat, FetchedCitation};
pub use sources::{CitationSource, CiteasSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
