use crate::index::WeightMatrix;
use crate::vector::SparseVector;
use crate::DocIndex;
use std::cmp::Ordering;

/// Cosine similarity; 0 when either vector has zero norm.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f32 {
    cosine_with_norms(a, a.norm(), b, b.norm())
}

fn cosine_with_norms(a: &SparseVector, norm_a: f32, b: &SparseVector, norm_b: f32) -> f32 {
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Similarity of `query` against every row, in row order.
pub fn similarities(query: &SparseVector, matrix: &WeightMatrix) -> Vec<f32> {
    let q_norm = query.norm();
    matrix
        .rows()
        .iter()
        .zip(matrix.norms())
        .map(|(row, &row_norm)| cosine_with_norms(query, q_norm, row, row_norm))
        .collect()
}

/// Rank rows by similarity to `query`, highest first; ties keep row order.
pub fn rank(query: &SparseVector, matrix: &WeightMatrix, limit: Option<usize>) -> Vec<(DocIndex, f32)> {
    rank_scores(&similarities(query, matrix), limit)
}

/// Order precomputed per-row scores descending with a stable sort.
pub fn rank_scores(scores: &[f32], limit: Option<usize>) -> Vec<(DocIndex, f32)> {
    let mut scored: Vec<(DocIndex, f32)> = scores.iter().copied().enumerate().collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    if let Some(k) = limit {
        scored.truncate(k);
    }
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TermId;

    fn v(pairs: &[(TermId, f32)]) -> SparseVector {
        SparseVector::from_weights(pairs.iter().copied().collect())
    }

    #[test]
    fn cosine_is_symmetric_and_bounded() {
        let samples = [
            v(&[(0, 1.0), (1, 2.0)]),
            v(&[(1, 0.5), (2, 3.0)]),
            v(&[(0, 4.0)]),
            v(&[(0, 0.1), (1, 0.1), (2, 0.1), (3, 9.0)]),
            v(&[]),
        ];
        for a in &samples {
            for b in &samples {
                let ab = cosine(a, b);
                assert_eq!(ab, cosine(b, a));
                assert!((-1.0..=1.0).contains(&ab));
                assert!(!ab.is_nan());
            }
            if !a.is_empty() {
                assert!((cosine(a, a) - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn zero_norm_gives_zero() {
        assert_eq!(cosine(&v(&[]), &v(&[(0, 1.0)])), 0.0);
        assert_eq!(cosine(&v(&[]), &v(&[])), 0.0);
    }

    #[test]
    fn rank_orders_descending_with_stable_ties() {
        let matrix = WeightMatrix::new(vec![
            v(&[(1, 1.0)]),
            v(&[(0, 1.0)]),
            v(&[(1, 1.0)]),
            v(&[(2, 1.0)]),
        ]);
        let ranked = rank(&v(&[(0, 1.0)]), &matrix, None);
        let order: Vec<DocIndex> = ranked.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![1, 0, 2, 3]);
        assert_eq!(rank(&v(&[(0, 1.0)]), &matrix, Some(2)).len(), 2);
    }
}
