//! Construction errors.
//!
//! Building a [`Recommender`](crate::recommend::Recommender) is the only
//! fallible operation in the core. Queries never fail: an unknown title is
//! an empty result, not an error.

use thiserror::Error;

/// Fatal error raised while building the vector space or similarity index.
///
/// Any construction failure invalidates the whole engine; there is no
/// partially usable state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// No records were available to build from.
    ///
    /// `dropped` counts the input records discarded for missing fields,
    /// so a corpus emptied by the drop policy is distinguishable from an
    /// empty input.
    #[error("cannot build an index from an empty corpus ({dropped} record(s) dropped for missing fields)")]
    EmptyCorpus { dropped: usize },

    /// The vocabulary size limit was zero, which admits no terms.
    #[error("max_vocabulary_size must be > 0")]
    InvalidVocabularySize,

    /// Every term was removed by stop-word filtering or the vocabulary size limit.
    #[error("vocabulary is empty after stop-word filtering and vocabulary size limits")]
    EmptyVocabulary,
}
