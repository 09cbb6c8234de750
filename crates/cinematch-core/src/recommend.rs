//! Title lookup and ranking over a built similarity index.
//!
//! A [`Recommender`] is built once from an ordered corpus and is immutable
//! afterwards. Every derived structure (records, vectors, similarity rows,
//! title index) is produced from that one sequence, so an item's ordinal is
//! the same in all of them.
//!
//! # Ranking
//!
//! 1. Lowercase the query and resolve it to the first row with that title.
//!    Unknown titles yield an empty result.
//! 2. Take the full similarity row.
//! 3. Sort by score (desc), ordinal (asc).
//! 4. Skip the queried row itself and take the next `n`.
//!
//! Step 4 removes the queried ordinal, not rank 0: an earlier item with
//! identical tags also scores 1.0 and sorts ahead of the query, and is kept.
//! A zero-vector item scores 0 against everything, so it only appears where
//! the remaining candidates also score 0, and then the ordinal tie-break
//! decides; at ordinal 0 it can come first.
//!
//! # Example
//!
//! ```rust
//! use cinematch_core::models::ItemRecord;
//! use cinematch_core::recommend::{BuildOptions, Recommender};
//!
//! let records = vec![
//!     ItemRecord::new("A", "space adventure hero"),
//!     ItemRecord::new("B", "space war hero"),
//!     ItemRecord::new("C", "cooking recipe dessert"),
//! ];
//! let engine = Recommender::from_records(records, &BuildOptions::default()).unwrap();
//! assert_eq!(engine.recommend("a", 2), vec!["B", "C"]);
//! assert!(engine.recommend("unknown", 5).is_empty());
//! ```

use std::collections::HashMap;

use serde::Serialize;

use crate::error::ConstructionError;
use crate::models::{ItemRecord, RawMovie};
use crate::similarity::{DenseSimilarityMatrix, OnDemandSimilarity, SimilaritySource};
use crate::tags::{assemble_corpus, DroppedRecord};
use crate::vectorize::{VectorSpace, VectorizerOptions};

/// Number of recommendations returned when the caller does not say.
pub const DEFAULT_LIMIT: usize = 5;

/// Which [`SimilaritySource`] backs the recommender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityStrategy {
    /// Eager N×N matrix.
    #[default]
    Dense,
    /// Rows scored per query.
    OnDemand,
}

/// Everything that shapes construction.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub vectorizer: VectorizerOptions,
    pub similarity: SimilarityStrategy,
}

/// What happened during construction.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub item_count: usize,
    pub vocabulary_size: usize,
    /// Titles whose tags matched no vocabulary term.
    pub zero_vector_items: Vec<String>,
    /// Input records discarded for missing fields.
    pub dropped: Vec<DroppedRecord>,
    pub similarity: &'static str,
}

/// A ranked recommendation with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub score: f64,
    pub ordinal: usize,
}

/// The built engine: vector space, similarity index, and title index.
pub struct Recommender {
    records: Vec<ItemRecord>,
    space: VectorSpace,
    similarity: Box<dyn SimilaritySource>,
    titles: HashMap<String, usize>,
    report: BuildReport,
}

/// Assemble tags for raw movies and build a [`Recommender`].
///
/// Records with missing fields are dropped and listed in the
/// [`BuildReport`]. Fails if nothing survives or the vocabulary is empty.
pub fn build(movies: &[RawMovie], options: &BuildOptions) -> Result<Recommender, ConstructionError> {
    let corpus = assemble_corpus(movies);
    if corpus.records.is_empty() {
        return Err(ConstructionError::EmptyCorpus {
            dropped: corpus.dropped.len(),
        });
    }
    Recommender::build_with_dropped(corpus.records, corpus.dropped, options)
}

impl Recommender {
    /// Build from already-assembled records.
    pub fn from_records(
        records: Vec<ItemRecord>,
        options: &BuildOptions,
    ) -> Result<Self, ConstructionError> {
        Self::build_with_dropped(records, Vec::new(), options)
    }

    fn build_with_dropped(
        records: Vec<ItemRecord>,
        dropped: Vec<DroppedRecord>,
        options: &BuildOptions,
    ) -> Result<Self, ConstructionError> {
        if records.is_empty() {
            return Err(ConstructionError::EmptyCorpus {
                dropped: dropped.len(),
            });
        }

        let tags: Vec<&str> = records.iter().map(|r| r.tags.as_str()).collect();
        let space = VectorSpace::build(&tags, &options.vectorizer)?;

        let similarity: Box<dyn SimilaritySource> = match options.similarity {
            SimilarityStrategy::Dense => Box::new(DenseSimilarityMatrix::build(space.vectors())),
            SimilarityStrategy::OnDemand => {
                Box::new(OnDemandSimilarity::new(space.shared_vectors()))
            }
        };

        let mut titles = HashMap::with_capacity(records.len());
        for (ordinal, record) in records.iter().enumerate() {
            titles.entry(record.title.to_lowercase()).or_insert(ordinal);
        }

        let zero_vector_items = records
            .iter()
            .zip(space.vectors())
            .filter(|(_, v)| v.is_zero())
            .map(|(r, _)| r.title.clone())
            .collect();

        let report = BuildReport {
            item_count: records.len(),
            vocabulary_size: space.vocabulary().len(),
            zero_vector_items,
            dropped,
            similarity: similarity.strategy_name(),
        };

        Ok(Self {
            records,
            space,
            similarity,
            titles,
            report,
        })
    }

    /// Row ordinal for a title, case-insensitively. First occurrence wins.
    pub fn lookup(&self, title: &str) -> Option<usize> {
        self.titles.get(&title.to_lowercase()).copied()
    }

    /// Titles of the `n` items most similar to `title`, best first.
    ///
    /// Unknown titles and `n == 0` give an empty list.
    pub fn recommend(&self, title: &str, n: usize) -> Vec<String> {
        self.recommend_scored(title, n)
            .into_iter()
            .map(|r| r.title)
            .collect()
    }

    /// Like [`recommend`](Self::recommend), with scores and ordinals.
    pub fn recommend_scored(&self, title: &str, n: usize) -> Vec<Recommendation> {
        let Some(ordinal) = self.lookup(title) else {
            return Vec::new();
        };
        let Some(mut row) = self.similarity.row(ordinal) else {
            return Vec::new();
        };

        row.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        row.into_iter()
            .filter(|(other, _)| *other != ordinal)
            .take(n)
            .map(|(other, score)| Recommendation {
                title: self.records[other].title.clone(),
                score,
                ordinal: other,
            })
            .collect()
    }

    /// The `k` highest-weighted vocabulary terms of an item.
    pub fn top_terms(&self, title: &str, k: usize) -> Vec<(String, f64)> {
        let Some(vector) = self.lookup(title).and_then(|o| self.space.vector(o)) else {
            return Vec::new();
        };
        let mut weighted: Vec<(usize, f64)> = vector.entries().to_vec();
        weighted.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        weighted
            .into_iter()
            .take(k)
            .filter_map(|(col, w)| {
                self.space
                    .vocabulary()
                    .term(col)
                    .map(|t| (t.to_string(), w))
            })
            .collect()
    }

    /// Similarity between two rows.
    pub fn similarity(&self, i: usize, j: usize) -> Option<f64> {
        self.similarity.similarity(i, j)
    }

    pub fn records(&self) -> &[ItemRecord] {
        &self.records
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.title.as_str())
    }

    pub fn vector_space(&self) -> &VectorSpace {
        &self.space
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl std::fmt::Debug for Recommender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recommender")
            .field("items", &self.records.len())
            .field("vocabulary", &self.space.vocabulary().len())
            .field("similarity", &self.report.similarity)
            .finish()
    }
}
