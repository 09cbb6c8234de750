//! Core data models used throughout Cinematch.
//!
//! [`RawMovie`] is what an ingestion layer hands to the core: every list
//! field is already parsed into structured entries. [`ItemRecord`] is the
//! assembled form that the vector space is built from.

use serde::{Deserialize, Serialize};

/// A labeled entry from a genre, keyword, or cast list.
///
/// Source objects carry more keys (`id`, `character`, `credit_id`, ...);
/// only `name` is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntry {
    pub name: String,
}

impl NamedEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A crew credit: a person and the job they held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewEntry {
    pub name: String,
    pub job: String,
}

impl CrewEntry {
    pub fn new(name: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            job: job.into(),
        }
    }
}

/// Raw per-movie metadata before tag assembly.
///
/// `None` in any field means the field was absent or unreadable in the
/// source. Such records are dropped from the corpus, never defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMovie {
    pub title: Option<String>,
    pub overview: Option<String>,
    pub genres: Option<Vec<NamedEntry>>,
    pub keywords: Option<Vec<NamedEntry>>,
    pub cast: Option<Vec<NamedEntry>>,
    pub crew: Option<Vec<CrewEntry>>,
}

/// An item in the corpus: its display title and its lowercase tag blob.
///
/// The position of a record in the corpus is its ordinal in every derived
/// structure (vectors, similarity rows, title index).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemRecord {
    pub title: String,
    pub tags: String,
}

impl ItemRecord {
    pub fn new(title: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tags: tags.into(),
        }
    }
}
