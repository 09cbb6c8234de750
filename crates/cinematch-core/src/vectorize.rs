//! TF-IDF vector space over assembled tag blobs.
//!
//! # Algorithm
//!
//! 1. Tokenize every blob: lowercase, split on anything that is not
//!    alphanumeric or `_`, keep tokens of two or more characters.
//! 2. Drop stop words.
//! 3. Gather corpus statistics per term: total count, document frequency,
//!    and first-seen position.
//! 4. Smoothed IDF: `idf(t) = ln((1 + N) / (1 + df(t))) + 1`.
//! 5. Rank terms by [`VocabularyRanking`] (desc), ties by first-seen order,
//!    and keep the top `max_vocabulary_size`.
//! 6. Assign columns to the kept terms in lexicographic order.
//! 7. Weight each item: `tf(item, t) × idf(t)` for every kept term.
//!
//! Vectors come out in input order, one per blob.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use crate::error::ConstructionError;
use crate::stopwords::StopWords;

/// Vocabulary size used when none is configured.
pub const DEFAULT_MAX_VOCABULARY_SIZE: usize = 5000;

/// How terms compete for a place in a bounded vocabulary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyRanking {
    /// Corpus-wide term count × smoothed IDF.
    #[default]
    TfIdf,
    /// Corpus-wide term count only.
    Frequency,
}

/// Vectorizer settings.
#[derive(Debug, Clone)]
pub struct VectorizerOptions {
    pub max_vocabulary_size: usize,
    pub ranking: VocabularyRanking,
    pub stop_words: StopWords,
}

impl Default for VectorizerOptions {
    fn default() -> Self {
        Self {
            max_vocabulary_size: DEFAULT_MAX_VOCABULARY_SIZE,
            ranking: VocabularyRanking::default(),
            stop_words: StopWords::english(),
        }
    }
}

/// Split text into lowercase word tokens of at least two characters.
///
/// ```rust
/// use cinematch_core::vectorize::tokenize;
///
/// assert_eq!(tokenize("Sci-Fi, 22nd century: a marine"), vec!["sci", "fi", "22nd", "century", "marine"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(|t| t.to_lowercase())
        .collect()
}

/// The fixed set of terms used as vector dimensions.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms: Vec<String>,
    idf: Vec<f64>,
    columns: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Column of `term`, if it made it into the vocabulary.
    pub fn column(&self, term: &str) -> Option<usize> {
        self.columns.get(term).copied()
    }

    pub fn term(&self, column: usize) -> Option<&str> {
        self.terms.get(column).map(String::as_str)
    }

    pub fn idf(&self, column: usize) -> Option<f64> {
        self.idf.get(column).copied()
    }

    /// Terms in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}

/// Sparse TF-IDF weights for one item.
///
/// Entries are sorted by column and hold only non-zero weights.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl ItemVector {
    pub fn new(dimension: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|(_, w)| *w != 0.0);
        entries.sort_by_key(|(col, _)| *col);
        Self { dimension, entries }
    }

    /// Vocabulary size this vector lives in.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn weight(&self, column: usize) -> f64 {
        self.entries
            .binary_search_by_key(&column, |(c, _)| *c)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    /// True when no vocabulary term occurs in the item.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    /// Dot product, merged over sorted columns.
    pub fn dot(&self, other: &ItemVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (ca, wa) = self.entries[i];
            let (cb, wb) = other.entries[j];
            match ca.cmp(&cb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// A vocabulary and the item vectors built over it, in corpus order.
///
/// The vectors sit behind an `Arc` so a similarity source can hold them
/// without a second copy.
#[derive(Debug, Clone)]
pub struct VectorSpace {
    vocabulary: Vocabulary,
    vectors: Arc<[ItemVector]>,
}

struct TermStats {
    first_seen: usize,
    count: usize,
    df: usize,
}

impl VectorSpace {
    /// Fit the vocabulary and weight every document in one pass.
    pub fn build<S: AsRef<str>>(
        documents: &[S],
        options: &VectorizerOptions,
    ) -> Result<Self, ConstructionError> {
        if documents.is_empty() {
            return Err(ConstructionError::EmptyCorpus { dropped: 0 });
        }
        if options.max_vocabulary_size == 0 {
            return Err(ConstructionError::InvalidVocabularySize);
        }

        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| {
                tokenize(doc.as_ref())
                    .into_iter()
                    .filter(|t| !options.stop_words.contains(t))
                    .collect()
            })
            .collect();

        let mut order: Vec<&str> = Vec::new();
        let mut stats: HashMap<&str, TermStats> = HashMap::new();
        for tokens in &tokenized {
            let mut seen_here: HashSet<&str> = HashSet::new();
            for token in tokens {
                let entry = stats.entry(token.as_str()).or_insert_with(|| {
                    order.push(token.as_str());
                    TermStats {
                        first_seen: order.len() - 1,
                        count: 0,
                        df: 0,
                    }
                });
                entry.count += 1;
                if seen_here.insert(token.as_str()) {
                    entry.df += 1;
                }
            }
        }

        let n = documents.len() as f64;
        let idf_of = |df: usize| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;

        let mut ranked: Vec<(&str, f64, usize)> = order
            .iter()
            .map(|term| {
                let s = &stats[term];
                let score = match options.ranking {
                    VocabularyRanking::TfIdf => s.count as f64 * idf_of(s.df),
                    VocabularyRanking::Frequency => s.count as f64,
                };
                (*term, score, s.first_seen)
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.2.cmp(&b.2))
        });
        ranked.truncate(options.max_vocabulary_size);

        if ranked.is_empty() {
            return Err(ConstructionError::EmptyVocabulary);
        }

        let mut kept: Vec<&str> = ranked.into_iter().map(|(t, _, _)| t).collect();
        kept.sort_unstable();

        let terms: Vec<String> = kept.iter().map(|t| t.to_string()).collect();
        let idf: Vec<f64> = kept.iter().map(|t| idf_of(stats[t].df)).collect();
        let columns: HashMap<String, usize> = terms
            .iter()
            .enumerate()
            .map(|(col, t)| (t.clone(), col))
            .collect();
        let vocabulary = Vocabulary {
            terms,
            idf,
            columns,
        };

        let vectors: Vec<ItemVector> = tokenized
            .iter()
            .map(|tokens| vocabulary.weigh(tokens))
            .collect();

        Ok(Self {
            vocabulary,
            vectors: Arc::from(vectors),
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn vectors(&self) -> &[ItemVector] {
        &self.vectors
    }

    /// Another handle to the same vectors.
    pub fn shared_vectors(&self) -> Arc<[ItemVector]> {
        Arc::clone(&self.vectors)
    }

    pub fn vector(&self, ordinal: usize) -> Option<&ItemVector> {
        self.vectors.get(ordinal)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl Vocabulary {
    fn weigh(&self, tokens: &[String]) -> ItemVector {
        let mut tf: HashMap<usize, usize> = HashMap::new();
        for token in tokens {
            if let Some(col) = self.column(token) {
                *tf.entry(col).or_insert(0) += 1;
            }
        }
        let entries = tf
            .into_iter()
            .map(|(col, count)| (col, count as f64 * self.idf[col]))
            .collect();
        ItemVector::new(self.len(), entries)
    }
}
