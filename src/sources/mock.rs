//! Mock source for testing purposes.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

use crate::models::CitationFormat;
use crate::sources::{CitationSource, SourceError};

/// A mock source that replays scripted responses per package.
///
/// Each package has a queue of outcomes consumed one per lookup; once the
/// queue is down to its last entry that entry is repeated. Packages with no
/// script fail with a permanent API error.
#[derive(Debug, Default)]
pub struct MockSource {
    scripts: Mutex<HashMap<String, VecDeque<Result<Value, SourceError>>>>,
    calls: Mutex<Vec<String>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `package` with `record`.
    pub fn respond(&self, package: &str, record: Value) -> &Self {
        self.script(package, vec![Ok(record)])
    }

    /// Fail `failures` times with a network error, then answer with `record`.
    pub fn fail_then_respond(&self, package: &str, failures: usize, record: Value) -> &Self {
        let mut outcomes: Vec<_> = (0..failures)
            .map(|i| Err(SourceError::Network(format!("simulated failure {}", i + 1))))
            .collect();
        outcomes.push(Ok(record));
        self.script(package, outcomes)
    }

    /// Set the full sequence of outcomes for `package`.
    pub fn script(&self, package: &str, outcomes: Vec<Result<Value, SourceError>>) -> &Self {
        lock(&self.scripts).insert(package.to_string(), outcomes.into());
        self
    }

    /// Number of lookups made for any package.
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Number of lookups made for `package`.
    pub fn calls_for(&self, package: &str) -> usize {
        lock(&self.calls).iter().filter(|p| *p == package).count()
    }

    /// Packages in the order they were looked up.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl CitationSource for MockSource {
    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn lookup(&self, package: &str) -> Result<Value, SourceError> {
        lock(&self.calls).push(package.to_string());

        let mut scripts = lock(&self.scripts);
        let queue = scripts
            .get_mut(package)
            .ok_or_else(|| SourceError::Api(format!("no mock response for '{}'", package)))?;

        match queue.len() {
            0 => Err(SourceError::Api(format!("empty script for '{}'", package))),
            1 => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(SourceError::Api("empty script".into()))),
            _ => queue
                .pop_front()
                .unwrap_or_else(|| Err(SourceError::Api("empty script".into()))),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Build a CiteAs-shaped record whose entry for each style is `"<prefix> <STYLE>"`.
pub fn make_record(prefix: &str) -> Value {
    let citations: Vec<Value> = CitationFormat::ALL
        .iter()
        .map(|f| {
            json!({
                "style_fullname": f.name(),
                "style_shortname": f.name().to_lowercase(),
                "citation": format!("{} {}", prefix, f.name()),
            })
        })
        .collect();
    json!({ "name": prefix, "citations": citations })
}

/// Build a record with the given APS entry and `citation` in every other slot.
pub fn make_record_with(aps: &str, citation: &str) -> Value {
    let citations: Vec<Value> = CitationFormat::ALL
        .iter()
        .map(|f| {
            let text = if *f == CitationFormat::Aps { aps } else { citation };
            json!({ "style_shortname": f.name().to_lowercase(), "citation": text })
        })
        .collect();
    json!({ "citations": citations })
}
