//! End-to-end citation generation: manifest in, bibliography out.

use std::path::PathBuf;

use crate::bibliography::{assemble_today, write_document};
use crate::config::{Config, FailurePolicy};
use crate::error::{Error, Result};
use crate::fetcher::fetch_citation;
use crate::manifest::parse_manifest;
use crate::models::FetchedCitation;
use crate::sources::{CitationSource, CiteasSource};
use crate::utils::HttpClient;

/// What a run produced
#[derive(Debug, Default)]
pub struct RunReport {
    pub manifest: PathBuf,
    pub output: PathBuf,
    /// Citations written, in manifest order
    pub citations: Vec<FetchedCitation>,
    /// Packages left out under [`FailurePolicy::Skip`], with the reason
    pub skipped: Vec<(String, String)>,
}

impl RunReport {
    /// Packages whose APS entry carried the `(n.d.)` marker
    pub fn mangled(&self) -> impl Iterator<Item = &str> {
        self.citations
            .iter()
            .filter(|c| c.mangled_authorship)
            .map(|c| c.package.as_str())
    }

    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// The production CiteAs source described by `config`
pub fn citeas_source(config: &Config) -> Result<CiteasSource> {
    let client = HttpClient::with_timeout(config.timeout()).map_err(Error::Client)?;
    Ok(CiteasSource::new(client)
        .with_api_base(config.api_base.clone())
        .with_email(config.email.clone()))
}

/// Read the manifest, cite every package in order, and write the bibliography.
///
/// The manifest's existence is checked before anything touches `source`.
/// Packages are looked up one at a time, with `config.request_delay()`
/// between consecutive lookups.
pub async fn run(config: &Config, source: &dyn CitationSource) -> Result<RunReport> {
    let manifest = config.manifest_path();
    if !manifest.is_file() {
        return Err(Error::ManifestNotFound { path: manifest });
    }

    let packages = parse_manifest(&manifest)?;
    tracing::info!(
        "Citing {} package(s) from {} via {}",
        packages.len(),
        manifest.display(),
        source.name()
    );

    let mut report = RunReport {
        manifest,
        output: config.output_file.clone(),
        ..RunReport::default()
    };

    let retry = config.retry_config();
    let delay = config.request_delay();

    for (i, package) in packages.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match fetch_citation(source, package, config.format, retry).await {
            Ok(citation) => report.citations.push(citation),
            Err(err) if config.on_failure == FailurePolicy::Skip => {
                tracing::warn!("Skipping {}: {}", package, err);
                let skipped = err.package().unwrap_or(package).to_string();
                report.skipped.push((skipped, error_chain(&err)));
            }
            Err(err) => return Err(err),
        }
    }

    let citations: Vec<&str> = report
        .citations
        .iter()
        .map(|c| c.citation.as_str())
        .collect();
    write_document(&report.output, &assemble_today(&citations))?;

    tracing::info!(
        "Wrote {} citation(s) to {}",
        report.citations.len(),
        report.output.display()
    );
    Ok(report)
}

fn error_chain(err: &Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
