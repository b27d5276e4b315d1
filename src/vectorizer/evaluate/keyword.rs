use tracing::debug;

use crate::{
    annotate::{Annotator, PosFilter},
    config::DEFAULT_KEYWORD_SCORE_PRECISION,
    error::Result,
    utils::math::round_to,
    vectorizer::{evaluate::scoring::SimilarityScores, matrix::OccurrenceMatrix},
};

/// Surface keywords related to a query
///
/// Columns whose score, rounded to 2 decimals, is strictly positive are
/// selected. Their labels are joined into one pseudo-document, which is
/// annotated again; tokens passing `pos_filter` are returned in annotator
/// order, repeats included.
pub fn extract_keywords<A>(
    annotator: &A,
    matrix: &OccurrenceMatrix,
    scores: &SimilarityScores,
    pos_filter: &PosFilter,
) -> Result<Vec<String>>
where
    A: Annotator + ?Sized,
{
    extract_keywords_with_precision(annotator, matrix, scores, pos_filter, DEFAULT_KEYWORD_SCORE_PRECISION)
}

/// `extract_keywords` with a custom rounding precision
pub fn extract_keywords_with_precision<A>(
    annotator: &A,
    matrix: &OccurrenceMatrix,
    scores: &SimilarityScores,
    pos_filter: &PosFilter,
    precision: u32,
) -> Result<Vec<String>>
where
    A: Annotator + ?Sized,
{
    let selected: Vec<&str> = scores
        .iter()
        .filter(|(_, score)| round_to(*score, precision) > 0.0)
        .filter_map(|(col, _)| matrix.label(col.id))
        .collect();
    debug!(selected = selected.len(), docs = scores.len(), "keyword source documents");
    if selected.is_empty() {
        return Ok(Vec::new());
    }

    let pseudo_document = selected.join(" ");
    let tokens = annotator.annotate(&pseudo_document)?;
    Ok(tokens
        .into_iter()
        .filter(|t| pos_filter.contains(t.pos))
        .map(|t| t.text)
        .collect())
}
