//! Cosine similarity over item vectors.
//!
//! The [`SimilaritySource`] trait is the lookup surface the recommender
//! ranks against. Two implementations share the same scoring function and
//! so return identical values:
//!
//! - [`DenseSimilarityMatrix`] materializes all N×N scores at construction
//!   (upper triangle computed, mirrored). O(N²) memory, O(N) per row.
//! - [`OnDemandSimilarity`] keeps only the sparse vectors and scores one
//!   row per lookup. O(N) memory, O(N·nnz) per row.
//!
//! A vector with norm 0 scores 0 against everything, itself included.

use std::sync::Arc;

use crate::vectorize::ItemVector;

/// Cosine of the angle between `a` and `b`.
///
/// Returns `0.0` if either vector has norm 0. Weights are non-negative, so
/// the result is clamped to `[0.0, 1.0]` to absorb rounding.
pub fn cosine_similarity(a: &ItemVector, b: &ItemVector) -> f64 {
    scaled(a.dot(b), a.norm(), b.norm())
}

fn scaled(dot: f64, norm_a: f64, norm_b: f64) -> f64 {
    let denom = norm_a * norm_b;
    if denom == 0.0 {
        return 0.0;
    }
    (dot / denom).clamp(0.0, 1.0)
}

/// Score a pair with cached norms. Non-zero diagonal cells are exactly 1.0.
fn pair_score(vectors: &[ItemVector], norms: &[f64], i: usize, j: usize) -> f64 {
    if norms[i] == 0.0 || norms[j] == 0.0 {
        return 0.0;
    }
    if i == j {
        return 1.0;
    }
    scaled(vectors[i].dot(&vectors[j]), norms[i], norms[j])
}

/// Read access to pairwise item similarity, addressed by corpus ordinal.
pub trait SimilaritySource: Send + Sync {
    /// Number of items (rows).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Similarity of item `i` to item `j`, or `None` if either is out of range.
    fn similarity(&self, i: usize, j: usize) -> Option<f64>;

    /// Every `(ordinal, score)` pair for row `i`, in ordinal order.
    ///
    /// No filtering or sorting happens here.
    fn row(&self, i: usize) -> Option<Vec<(usize, f64)>> {
        if i >= self.len() {
            return None;
        }
        (0..self.len())
            .map(|j| self.similarity(i, j).map(|s| (j, s)))
            .collect()
    }

    /// Short name for logs and reports.
    fn strategy_name(&self) -> &'static str;
}

/// Fully materialized, symmetric N×N similarity matrix.
#[derive(Debug, Clone)]
pub struct DenseSimilarityMatrix {
    n: usize,
    cells: Vec<f64>,
}

impl DenseSimilarityMatrix {
    pub fn build(vectors: &[ItemVector]) -> Self {
        let n = vectors.len();
        let norms: Vec<f64> = vectors.iter().map(ItemVector::norm).collect();
        let mut cells = vec![0.0; n * n];
        for i in 0..n {
            for j in i..n {
                let s = pair_score(vectors, &norms, i, j);
                cells[i * n + j] = s;
                cells[j * n + i] = s;
            }
        }
        Self { n, cells }
    }
}

impl SimilaritySource for DenseSimilarityMatrix {
    fn len(&self) -> usize {
        self.n
    }

    fn similarity(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.n || j >= self.n {
            return None;
        }
        Some(self.cells[i * self.n + j])
    }

    fn row(&self, i: usize) -> Option<Vec<(usize, f64)>> {
        if i >= self.n {
            return None;
        }
        let start = i * self.n;
        Some(
            self.cells[start..start + self.n]
                .iter()
                .copied()
                .enumerate()
                .collect(),
        )
    }

    fn strategy_name(&self) -> &'static str {
        "dense"
    }
}

/// Similarity computed per lookup from the sparse vectors.
///
/// Holds a shared handle to the vectors, so next to a `VectorSpace` it
/// adds only the norms.
#[derive(Debug, Clone)]
pub struct OnDemandSimilarity {
    vectors: Arc<[ItemVector]>,
    norms: Vec<f64>,
}

impl OnDemandSimilarity {
    pub fn new(vectors: Arc<[ItemVector]>) -> Self {
        let norms = vectors.iter().map(ItemVector::norm).collect();
        Self { vectors, norms }
    }
}

impl SimilaritySource for OnDemandSimilarity {
    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn similarity(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.vectors.len() || j >= self.vectors.len() {
            return None;
        }
        Some(pair_score(&self.vectors, &self.norms, i, j))
    }

    fn strategy_name(&self) -> &'static str {
        "on_demand"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectors() -> Vec<ItemVector> {
        vec![
            ItemVector::new(3, vec![(0, 1.0), (1, 1.0)]),
            ItemVector::new(3, vec![(0, 2.0), (2, 1.0)]),
            ItemVector::new(3, vec![]),
            ItemVector::new(3, vec![(2, 4.0)]),
        ]
    }

    #[test]
    fn test_cosine_identical() {
        let v = ItemVector::new(2, vec![(0, 3.0), (1, 4.0)]);
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = ItemVector::new(2, vec![(0, 1.0)]);
        let b = ItemVector::new(2, vec![(1, 1.0)]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let a = ItemVector::new(2, vec![]);
        let b = ItemVector::new(2, vec![(1, 1.0)]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
        assert_eq!(cosine_similarity(&a, &a), 0.0);
    }

    #[test]
    fn test_dense_diagonal() {
        let m = DenseSimilarityMatrix::build(&vectors());
        assert_eq!(m.similarity(0, 0), Some(1.0));
        assert_eq!(m.similarity(1, 1), Some(1.0));
        assert_eq!(m.similarity(2, 2), Some(0.0));
    }

    #[test]
    fn test_dense_symmetric_and_bounded() {
        let m = DenseSimilarityMatrix::build(&vectors());
        for i in 0..m.len() {
            for j in 0..m.len() {
                let a = m.similarity(i, j).unwrap();
                assert_eq!(a, m.similarity(j, i).unwrap());
                assert!((0.0..=1.0).contains(&a));
            }
        }
    }

    #[test]
    fn test_dense_values() {
        let m = DenseSimilarityMatrix::build(&vectors());
        let expected = 2.0 / (2.0f64.sqrt() * 5.0f64.sqrt());
        assert!((m.similarity(0, 1).unwrap() - expected).abs() < 1e-12);
        assert_eq!(m.similarity(0, 3), Some(0.0));
    }

    #[test]
    fn test_row_is_full_and_ordered() {
        let m = DenseSimilarityMatrix::build(&vectors());
        let row = m.row(1).unwrap();
        let ordinals: Vec<usize> = row.iter().map(|(o, _)| *o).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3]);
        assert_eq!(row[1].1, 1.0);
    }

    #[test]
    fn test_out_of_range() {
        let m = DenseSimilarityMatrix::build(&vectors());
        assert!(m.row(4).is_none());
        assert!(m.similarity(0, 4).is_none());
        let lazy = OnDemandSimilarity::new(vectors().into());
        assert!(lazy.row(4).is_none());
    }

    #[test]
    fn test_on_demand_matches_dense() {
        let dense = DenseSimilarityMatrix::build(&vectors());
        let lazy = OnDemandSimilarity::new(vectors().into());
        assert_eq!(dense.len(), lazy.len());
        for i in 0..dense.len() {
            assert_eq!(dense.row(i), lazy.row(i));
        }
    }

    #[test]
    fn test_empty_corpus() {
        let m = DenseSimilarityMatrix::build(&[]);
        assert!(m.is_empty());
        assert!(m.row(0).is_none());
    }
}
