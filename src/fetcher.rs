//! Fetching one package's citation.

use crate::error::{Error, Result};
use crate::models::{is_mangled_authorship, CitationFormat, CiteasResponse, FetchedCitation};
use crate::sources::CitationSource;
use crate::utils::{with_retry, RetryConfig, RetryResult};

/// Look up `package` and return its citation in `format`.
///
/// Transport and JSON failures are retried according to `retry`. A record
/// that parses but lacks the requested entry is a [`Error::MalformedResponse`]
/// and is not retried.
///
/// CiteAs signals authors it could not resolve by rendering the APS entry
/// with a `(n.d.)` prefix. That case is logged as a warning and flagged on
/// the result; it does not change the returned citation.
pub async fn fetch_citation(
    source: &dyn CitationSource,
    package: &str,
    format: CitationFormat,
    retry: RetryConfig,
) -> Result<FetchedCitation> {
    tracing::info!("Fetching {} citation for {}", format, package);

    let outcome = with_retry(retry, || source.lookup(package)).await;
    tracing::debug!(
        "Lookup for {} finished after {} attempt(s)",
        package,
        outcome.attempts()
    );

    let (value, attempts) = match outcome {
        RetryResult::Success(value, attempts) => (value, attempts),
        RetryResult::TransientFailure(source, attempts) => {
            return Err(Error::FetchExhausted {
                package: package.to_string(),
                attempts,
                source,
            })
        }
        RetryResult::PermanentFailure(source, _) => {
            return Err(Error::Lookup {
                package: package.to_string(),
                source,
            })
        }
    };

    let malformed = |reason: String| Error::MalformedResponse {
        package: package.to_string(),
        reason,
    };

    let response = CiteasResponse::from_value(value).map_err(malformed)?;
    let citation = response.citation(format).map_err(malformed)?.to_string();

    let mangled_authorship = response
        .citation(CitationFormat::Aps)
        .is_ok_and(is_mangled_authorship);
    if mangled_authorship {
        tracing::warn!(
            "Authorship record for requested package {} appears to be mangled",
            package
        );
    }

    Ok(FetchedCitation {
        package: package.to_string(),
        format,
        citation,
        mangled_authorship,
        attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::{make_record, make_record_with};
    use crate::sources::{MockSource, SourceError};
    use serde_json::json;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    fn no_delay() -> RetryConfig {
        RetryConfig::immediate(7)
    }

    #[tokio::test]
    async fn test_returns_selected_format() {
        let source = MockSource::new();
        source.respond("numpy", make_record("numpy"));

        for format in CitationFormat::ALL {
            let fetched = fetch_citation(&source, "numpy", format, no_delay())
                .await
                .unwrap();
            assert_eq!(fetched.citation, format!("numpy {}", format.name()));
            assert_eq!(fetched.format, format);
            assert_eq!(fetched.attempts, 1);
        }
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        for failures in 1..7 {
            let source = MockSource::new();
            source.fail_then_respond("pandas", failures, make_record("pandas"));

            let fetched = fetch_citation(&source, "pandas", CitationFormat::Nature, no_delay())
                .await
                .unwrap();
            assert_eq!(fetched.citation, "pandas Nature");
            assert_eq!(fetched.attempts as usize, failures + 1);
            assert_eq!(source.calls_for("pandas"), failures + 1);
        }
    }

    #[tokio::test]
    async fn test_exhausts_after_seven_attempts() {
        let source = MockSource::new();
        source.fail_then_respond("pandas", 7, make_record("pandas"));

        let err = fetch_citation(&source, "pandas", CitationFormat::Nature, no_delay())
            .await
            .unwrap_err();

        match err {
            Error::FetchExhausted {
                package, attempts, ..
            } => {
                assert_eq!(package, "pandas");
                assert_eq!(attempts, 7);
            }
            other => panic!("Expected FetchExhausted, got {:?}", other),
        }
        assert_eq!(source.call_count(), 7);
    }

    #[tokio::test]
    async fn test_malformed_response_is_not_retried() {
        let source = MockSource::new();
        source.respond("numpy", json!({ "name": "numpy" }));

        let err = fetch_citation(&source, "numpy", CitationFormat::Nature, no_delay())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
        assert_eq!(err.package(), Some("numpy"));
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_short_citation_list_is_malformed() {
        let source = MockSource::new();
        source.respond(
            "numpy",
            json!({ "citations": [ { "citation": "only APS" } ] }),
        );

        let err = fetch_citation(&source, "numpy", CitationFormat::Vancouver, no_delay())
            .await
            .unwrap_err();
        match err {
            Error::MalformedResponse { reason, .. } => assert!(reason.contains("index 5")),
            other => panic!("Expected MalformedResponse, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_permanent_source_error() {
        let source = MockSource::new();
        source.script(
            "nonexistent",
            vec![Err(SourceError::Status {
                status: 404,
                body: "not found".into(),
            })],
        );

        let err = fetch_citation(&source, "nonexistent", CitationFormat::Nature, no_delay())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Lookup { .. }));
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mangled_authorship_flag() {
        let source = MockSource::new();
        source.respond("mangled", make_record_with("(n.d.) Some Author.", "MANGLED"));
        source.respond("fine", make_record_with("(2020) Some Author.", "FINE"));

        let mangled = fetch_citation(&source, "mangled", CitationFormat::Nature, no_delay())
            .await
            .unwrap();
        assert!(mangled.mangled_authorship);
        assert_eq!(mangled.citation, "MANGLED");

        let fine = fetch_citation(&source, "fine", CitationFormat::Nature, no_delay())
            .await
            .unwrap();
        assert!(!fine.mangled_authorship);
        assert_eq!(fine.citation, "FINE");
    }

    #[tokio::test]
    async fn test_mangled_aps_is_returned_unchanged() {
        let source = MockSource::new();
        source.respond("mangled", make_record_with("(n.d.) Some Author.", "other"));

        let fetched = fetch_citation(&source, "mangled", CitationFormat::Aps, no_delay())
            .await
            .unwrap();
        assert!(fetched.mangled_authorship);
        assert_eq!(fetched.citation, "(n.d.) Some Author.");
    }

    #[tokio::test]
    async fn test_odd_unselected_entry_is_ignored() {
        let source = MockSource::new();
        source.respond(
            "numpy",
            json!({
                "citations": [
                    { "citation": "(2020) Harris, C." },
                    { "citation": "harvard" },
                    { "citation": "NATURE" },
                    { "citation": null }
                ]
            }),
        );

        let fetched = fetch_citation(&source, "numpy", CitationFormat::Nature, no_delay())
            .await
            .unwrap();
        assert_eq!(fetched.citation, "NATURE");
        assert!(!fetched.mangled_authorship);

        let err = fetch_citation(&source, "numpy", CitationFormat::Mla, no_delay())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_missing_aps_entry_is_not_mangled() {
        let source = MockSource::new();
        source.respond(
            "numpy",
            json!({
                "citations": [
                    { "citation": null },
                    { "citation": "harvard" },
                    { "citation": "NATURE" }
                ]
            }),
        );

        let fetched = fetch_citation(&source, "numpy", CitationFormat::Nature, no_delay())
            .await
            .unwrap();
        assert_eq!(fetched.citation, "NATURE");
        assert!(!fetched.mangled_authorship);
    }

    /// Collects formatted log output for assertions
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    async fn warnings_while_fetching(aps: &str) -> String {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let source = MockSource::new();
        source.respond("somepkg", make_record_with(aps, "CITATION"));
        fetch_citation(&source, "somepkg", CitationFormat::Nature, no_delay())
            .await
            .unwrap();

        logs.contents()
    }

    #[tokio::test]
    async fn test_mangled_authorship_warning_is_logged() {
        let output = warnings_while_fetching("(n.d.) Some Author.").await;
        assert!(output.contains("WARN"));
        assert!(output.contains("Authorship record for requested package somepkg appears to be mangled"));
    }

    #[tokio::test]
    async fn test_no_warning_for_dated_citation() {
        let output = warnings_while_fetching("(2020) Some Author.").await;
        assert!(!output.contains("mangled"));
        assert!(output.is_empty());
    }
}
