use std::fmt::{self, Debug, Display};

use ndarray::Array1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    annotate::Document,
    error::{LsaError, Result},
    utils::math::{cosine_similarity, dot},
    vectorizer::{
        embedding::{project, Embedding},
        matrix::{Column, DocId, OccurrenceMatrix},
        reduce::Decomposition,
    },
};

/// One score per corpus document, in matrix column order
/// Scores are always finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScores {
    scores: Vec<f64>,
    columns: Vec<Column>,
}

impl SimilarityScores {
    pub(crate) fn new(scores: Vec<f64>, columns: Vec<Column>) -> Self {
        debug_assert_eq!(scores.len(), columns.len());
        Self { scores, columns }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// raw scores, index = column index
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.scores
    }

    pub fn get(&self, id: DocId) -> Option<f64> {
        self.scores.get(id.0).copied()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// (column, score) in column order
    pub fn iter(&self) -> impl Iterator<Item = (&Column, f64)> + '_ {
        self.columns.iter().zip(self.scores.iter().copied())
    }

    /// highest score, None when empty
    pub fn max(&self) -> Option<f64> {
        self.scores.iter().copied().max_by(|a, b| a.total_cmp(b))
    }

    /// Results sorted by descending score
    pub fn ranked(&self) -> Hits {
        let mut hits = Hits::new(
            self.iter()
                .map(|(col, score)| HitEntry {
                    id: col.id,
                    label: col.label.clone(),
                    score,
                })
                .collect(),
        );
        hits.sort_by_score();
        hits
    }
}

/// Single search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitEntry {
    pub id: DocId,
    pub label: Box<str>,
    pub score: f64,
}

/// Structure to store ranked results
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Hits {
    pub list: Vec<HitEntry>,
}

impl Hits {
    pub fn new(list: Vec<HitEntry>) -> Self {
        Hits { list }
    }

    /// Sort results by descending score
    /// Stable: equal scores keep column order.
    pub fn sort_by_score(&mut self) -> &mut Self {
        self.list.sort_by(|a, b| b.score.total_cmp(&a.score));
        self
    }

    /// Sort results by ascending score
    pub fn sort_by_score_rev(&mut self) -> &mut Self {
        self.list.sort_by(|a, b| a.score.total_cmp(&b.score));
        self
    }

    /// keep the first `n` entries
    pub fn top(mut self, n: usize) -> Self {
        self.list.truncate(n);
        self
    }

    pub fn ids(&self) -> Vec<DocId> {
        self.list.iter().map(|h| h.id).collect()
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // Pretty print: each hit on a new line
            writeln!(f, "Hits [")?;
            for hit in &self.list {
                writeln!(f, "    {}: {:.6} ({:?})", hit.id, hit.score, hit.label)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl Display for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, hit) in self.list.iter().enumerate() {
            writeln!(f, "{:>3}. {:.4} {} {}", rank + 1, hit.score, hit.id, hit.label)?;
        }
        Ok(())
    }
}

/// Score a query against every corpus document in the latent space
///
/// 1. project the query onto the matrix vocabulary
/// 2. fold in: `q_k = q · U_k · S_k⁻¹`
/// 3. cosine against each row of `V_k`
///
/// Components with a zero singular value are dropped on both sides.
/// A query sharing no term with the vocabulary scores 0.0 everywhere.
pub fn score_similarity(
    query: &Document,
    matrix: &OccurrenceMatrix,
    decomposition: &Decomposition,
) -> Result<SimilarityScores> {
    let embedding = project(&query.tokens, matrix.vocabulary());
    score_embedding(&embedding, matrix, decomposition)
}

/// Same as `score_similarity` for an already projected query
pub fn score_embedding(
    embedding: &Embedding,
    matrix: &OccurrenceMatrix,
    decomposition: &Decomposition,
) -> Result<SimilarityScores> {
    check_dims(matrix.n_terms(), decomposition.n_terms())?;
    check_dims(matrix.n_docs(), decomposition.n_docs())?;
    check_dims(matrix.n_terms(), embedding.len())?;

    let columns = matrix.columns().to_vec();
    if embedding.is_zero() {
        return Ok(SimilarityScores::new(vec![0.0; columns.len()], columns));
    }

    let s_inv = decomposition.s_inverse();
    // 特異値0の成分は両側から除外する
    let mask: Array1<f64> = decomposition.s.mapv(|sigma| if sigma > 0.0 { 1.0 } else { 0.0 });
    let query = Array1::from_iter(embedding.iter_f64());
    let folded = query.dot(&decomposition.u) * &s_inv;

    let scores: Vec<f64> = (0..decomposition.n_docs())
        .into_par_iter()
        .map(|j| {
            let row = decomposition.v.row(j);
            cosine_similarity(
                folded.iter().copied(),
                row.iter().zip(mask.iter()).map(|(v, m)| v * m),
            )
        })
        .collect();
    Ok(SimilarityScores::new(scores, columns))
}

/// Unreduced term-overlap score
/// Dot product of the query's term-frequency vector with each matrix column.
pub fn raw_similarity(query: &Document, matrix: &OccurrenceMatrix) -> SimilarityScores {
    let embedding = project(&query.tokens, matrix.vocabulary());
    let scores: Vec<f64> = (0..matrix.n_docs())
        .into_par_iter()
        .map(|j| {
            let column = matrix.counts().column(j);
            dot(embedding.iter_f64(), column.iter().map(|c| *c as f64))
        })
        .collect();
    SimilarityScores::new(scores, matrix.columns().to_vec())
}

#[inline]
fn check_dims(expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(LsaError::DimensionMismatch { expected, found })
    }
}
