use ndarray::{s, Array1, Array2};
use tracing::debug;

use crate::{
    error::{LsaError, Result},
    utils::math::svd::jacobi_svd,
    vectorizer::matrix::OccurrenceMatrix,
};

/// Rank-k latent space of an occurrence matrix
///
/// - `u`: terms × k
/// - `s`: k singular values, descending (diagonal of `S_k`)
/// - `v`: documents × k
///
/// Singular values that are numerically zero are stored as exactly `0.0`;
/// scoring drops those components.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub u: Array2<f64>,
    pub s: Array1<f64>,
    pub v: Array2<f64>,
    /// effective rank after clamping
    pub rank: usize,
    /// every singular value of the matrix, descending
    pub singular_values: Array1<f64>,
}

impl Decomposition {
    /// `S_k` as a k × k diagonal matrix
    pub fn s_matrix(&self) -> Array2<f64> {
        Array2::from_diag(&self.s)
    }

    /// `S_k⁻¹` with zero singular values mapped to 0
    pub fn s_inverse(&self) -> Array1<f64> {
        self.s.mapv(|sigma| if sigma > 0.0 { 1.0 / sigma } else { 0.0 })
    }

    /// number of components with a non-zero singular value
    pub fn effective_dims(&self) -> usize {
        self.s.iter().filter(|sigma| **sigma > 0.0).count()
    }

    pub fn n_terms(&self) -> usize {
        self.u.nrows()
    }

    pub fn n_docs(&self) -> usize {
        self.v.nrows()
    }
}

/// Decompose the matrix and keep the first `rank` components
/// `rank` above `min(terms, docs)` is clamped silently; `rank == 0` is an error.
pub fn reduce(matrix: &OccurrenceMatrix, rank: usize) -> Result<Decomposition> {
    if rank == 0 {
        return Err(LsaError::InvalidRank { requested: rank });
    }
    let (rows, cols) = matrix.shape();
    let max_rank = rows.min(cols);
    let k = rank.min(max_rank);
    if k < rank {
        debug!(requested = rank, clamped = k, rows, cols, "rank clamped to matrix dimensions");
    }

    let svd = jacobi_svd(&matrix.to_f64());
    debug!(sweeps = svd.sweeps, converged = svd.converged, rank = k, "decomposed occurrence matrix");

    Ok(Decomposition {
        u: svd.u.slice(s![.., ..k]).to_owned(),
        s: svd.singular_values.slice(s![..k]).to_owned(),
        v: svd.v.slice(s![.., ..k]).to_owned(),
        rank: k,
        singular_values: svd.singular_values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        annotate::{Document, PosTag, Token},
        vectorizer::{matrix::build_occurrence_matrix, vocabulary::Vocabulary},
    };

    fn matrix(docs: &[&str], vocab: &[&str]) -> OccurrenceMatrix {
        let corpus: Vec<Document> = docs
            .iter()
            .map(|d| Document::new(*d, d.split_whitespace().map(|w| Token::new(w, PosTag::Noun)).collect()))
            .collect();
        build_occurrence_matrix(&corpus, &Vocabulary::from_terms(vocab)).unwrap()
    }

    #[test]
    fn truncates_to_rank() {
        let m = matrix(&["a b", "b c", "c d a", "d"], &["a", "b", "c", "d"]);
        let d = reduce(&m, 2).unwrap();
        assert_eq!(d.rank, 2);
        assert_eq!(d.u.dim(), (4, 2));
        assert_eq!(d.s.len(), 2);
        assert_eq!(d.v.dim(), (4, 2));
        assert_eq!(d.s_matrix().dim(), (2, 2));
        assert_eq!(d.singular_values.len(), 4);
        assert!(d.s[0] >= d.s[1]);
    }

    #[test]
    fn rank_is_clamped() {
        let m = matrix(&["a b", "b c"], &["a", "b", "c"]);
        let clamped = reduce(&m, 10).unwrap();
        let exact = reduce(&m, 2).unwrap();
        assert_eq!(clamped.rank, 2);
        assert_eq!(clamped, exact);
    }

    #[test]
    fn zero_rank_is_rejected() {
        let m = matrix(&["a"], &["a"]);
        assert!(matches!(reduce(&m, 0), Err(LsaError::InvalidRank { requested: 0 })));
    }

    #[test]
    fn zero_singular_values_invert_to_zero() {
        // 同一文書が2つ -> rank 1
        let m = matrix(&["a b", "a b"], &["a", "b"]);
        let d = reduce(&m, 2).unwrap();
        assert_eq!(d.s[1], 0.0);
        assert_eq!(d.effective_dims(), 1);
        let inv = d.s_inverse();
        assert!((inv[0] - 1.0 / d.s[0]).abs() < 1e-12);
        assert_eq!(inv[1], 0.0);
        assert!(inv.iter().all(|x| x.is_finite()));
    }

    fn assert_orthonormal_columns(m: &Array2<f64>) {
        let gram = m.t().dot(m);
        for ((r, c), x) in gram.indexed_iter() {
            let want = if r == c { 1.0 } else { 0.0 };
            assert!((x - want).abs() < 1e-10, "gram[{r}, {c}] = {x}");
        }
    }

    #[test]
    fn repeated_documents_keep_orthonormal_v() {
        // terms < docs, V comes from the completed basis
        let m = matrix(&["a b", "a b", "a b"], &["a", "b"]);
        let d = reduce(&m, 2).unwrap();
        assert_eq!(d.s[1], 0.0);
        assert_eq!(d.v.dim(), (3, 2));
        assert_orthonormal_columns(&d.u);
        assert_orthonormal_columns(&d.v);
    }

    #[test]
    fn rank_deficient_terms_keep_orthonormal_u() {
        let m = matrix(&["a b", "a b"], &["a", "b", "c"]);
        let d = reduce(&m, 2).unwrap();
        assert_eq!(d.s[1], 0.0);
        assert_eq!(d.u.dim(), (3, 2));
        assert_orthonormal_columns(&d.u);
        assert_orthonormal_columns(&d.v);
    }
}
