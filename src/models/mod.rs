//! Core data models for citation lookups.

mod citation;

pub use citation::{
    is_mangled_authorship, CitationFormat, CiteasResponse, FetchedCitation,
    MANGLED_AUTHORSHIP_MARKER,
};
