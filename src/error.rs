//! Crate-level error type.

use std::path::PathBuf;

use crate::sources::SourceError;

/// Errors that abort (or, under the `skip` policy, drop) citation generation
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The dependency manifest does not exist
    #[error("Manifest not found: {}", path.display())]
    ManifestNotFound { path: PathBuf },

    /// Every attempt to reach the citation service failed
    #[error("Failure to obtain citation information for '{package}' after {attempts} attempts")]
    FetchExhausted {
        package: String,
        attempts: u32,
        #[source]
        source: SourceError,
    },

    /// The citation service rejected the lookup outright
    #[error("Citation lookup for '{package}' was rejected")]
    Lookup {
        package: String,
        #[source]
        source: SourceError,
    },

    /// The response did not have the expected shape
    #[error("Malformed citation response for '{package}': {reason}")]
    MalformedResponse { package: String, reason: String },

    /// The HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(#[source] SourceError),

    /// Unknown citation format selector
    #[error("Invalid citation format: {0}")]
    InvalidFormat(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// IO error (file system)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The package this error concerns, if any
    pub fn package(&self) -> Option<&str> {
        match self {
            Error::FetchExhausted { package, .. }
            | Error::Lookup { package, .. }
            | Error::MalformedResponse { package, .. } => Some(package),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
