//! Markdown bibliography rendering.
//!
//! The document layout is fixed:
//!
//! ```text
//! # Cited software
//!
//! (Results retrieved on: MM/DD/YY)
//!
//! <citation 1>
//!
//! <citation 2>
//! ```

use chrono::{Local, NaiveDate};
use std::path::Path;

use crate::error::Result;

/// Default output file name
pub const DEFAULT_OUTPUT_FILE: &str = "ACKNOWLEDGMENTS.md";

pub const TITLE_LINE: &str = "# Cited software";

/// Header block: title and retrieval date
pub fn header(retrieved_on: NaiveDate) -> String {
    format!(
        "{}\n\n(Results retrieved on: {})",
        TITLE_LINE,
        retrieved_on.format("%m/%d/%y")
    )
}

/// Render the document, citations in the order given.
pub fn assemble<S: AsRef<str>>(citations: &[S], retrieved_on: NaiveDate) -> String {
    let body = citations
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<&str>>()
        .join("\n\n");
    format!("{}\n\n{}", header(retrieved_on), body)
}

/// [`assemble`] stamped with today's local date
pub fn assemble_today<S: AsRef<str>>(citations: &[S]) -> String {
    assemble(citations, Local::now().date_naive())
}

/// Write `document` to `path`, replacing any existing file.
pub fn write_document(path: impl AsRef<Path>, document: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, document)?;
    tracing::debug!("Wrote {} bytes to {}", document.len(), path.display());
    Ok(())
}
