//! CiteAs product records and citation style selection.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Citation styles returned by CiteAs, in response order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "FormatRepr", into = "String")]
pub enum CitationFormat {
    /// American Physical Society
    Aps,
    /// Harvard
    Harvard,
    /// Nature
    #[default]
    Nature,
    /// MLA
    Mla,
    /// Chicago author-date
    Chicago,
    /// Vancouver
    Vancouver,
}

impl CitationFormat {
    /// All styles, ordered by their index in a CiteAs response
    pub const ALL: [CitationFormat; 6] = [
        CitationFormat::Aps,
        CitationFormat::Harvard,
        CitationFormat::Nature,
        CitationFormat::Mla,
        CitationFormat::Chicago,
        CitationFormat::Vancouver,
    ];

    /// Position of this style in the `citations` array
    pub fn index(self) -> usize {
        match self {
            CitationFormat::Aps => 0,
            CitationFormat::Harvard => 1,
            CitationFormat::Nature => 2,
            CitationFormat::Mla => 3,
            CitationFormat::Chicago => 4,
            CitationFormat::Vancouver => 5,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            CitationFormat::Aps => "APS",
            CitationFormat::Harvard => "Harvard",
            CitationFormat::Nature => "Nature",
            CitationFormat::Mla => "MLA",
            CitationFormat::Chicago => "Chicago",
            CitationFormat::Vancouver => "Vancouver",
        }
    }
}

impl fmt::Display for CitationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts either the numeric selector (`"2"`) or a style name (`"nature"`).
impl FromStr for CitationFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Self::from_index(index).ok_or_else(|| {
                Error::InvalidFormat(format!("selector {} is outside 0..=5", index))
            });
        }

        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidFormat(format!("unknown style '{}'", s)))
    }
}

impl From<CitationFormat> for String {
    fn from(format: CitationFormat) -> Self {
        format.name().to_lowercase()
    }
}

/// Config files and env vars may carry the selector as a number or a name
#[derive(Deserialize)]
#[serde(untagged)]
enum FormatRepr {
    Index(usize),
    Name(String),
}

impl TryFrom<FormatRepr> for CitationFormat {
    type Error = Error;

    fn try_from(repr: FormatRepr) -> Result<Self, Self::Error> {
        match repr {
            FormatRepr::Index(i) => i.to_string().parse(),
            FormatRepr::Name(name) => name.parse(),
        }
    }
}

/// A product record from `GET /product/<name>`
///
/// Only `citations` is required, and only as an array. Entries are looked up
/// by position on demand, so an odd entry in an unselected slot is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CiteasResponse {
    pub name: Option<String>,
    pub citations: Vec<Value>,
}

impl CiteasResponse {
    /// Interpret a JSON body already known to be well-formed JSON.
    ///
    /// A structural mismatch is reported as the reason string; callers
    /// attach the package name.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let Value::Object(mut record) = value else {
            return Err("response is not a JSON object".to_string());
        };

        let citations = match record.remove("citations") {
            Some(Value::Array(citations)) => citations,
            Some(_) => return Err("`citations` is not an array".to_string()),
            None => return Err("missing field `citations`".to_string()),
        };
        let name = record
            .get("name")
            .and_then(Value::as_str)
            .map(String::from);

        Ok(Self { name, citations })
    }

    /// Text of the entry for `format`
    pub fn citation(&self, format: CitationFormat) -> Result<&str, String> {
        let entry = self.citations.get(format.index()).ok_or_else(|| {
            format!(
                "no {} entry at index {} ({} citation(s) returned)",
                format,
                format.index(),
                self.citations.len()
            )
        })?;

        entry
            .get("citation")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                format!(
                    "{} entry at index {} has no citation text",
                    format,
                    format.index()
                )
            })
    }
}

/// Placeholder CiteAs puts where the year should be when it failed to
/// resolve the authors
pub const MANGLED_AUTHORSHIP_MARKER: &str = "(n.d.)";

/// Whether an APS-style citation carries the mangled-authorship marker
pub fn is_mangled_authorship(aps_citation: &str) -> bool {
    aps_citation.starts_with(MANGLED_AUTHORSHIP_MARKER)
}

/// A citation retrieved for one manifest entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchedCitation {
    pub package: String,
    pub format: CitationFormat,
    pub citation: String,
    pub mangled_authorship: bool,
    pub attempts: u32,
}
