use std::fmt;

use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    annotate::Document,
    error::{LsaError, Result},
    vectorizer::{embedding::{project, Embedding}, vocabulary::Vocabulary},
};

/// Column identifier: position of the document in the corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(pub usize);

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// Matrix column header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: DocId,
    /// source text of the document
    pub label: Box<str>,
}

/// terms × documents count matrix
/// `counts[[i, j]]` = occurrences of vocabulary entry `i` in document `j`.
/// Columns are in corpus order and each carries its `DocId`.
#[derive(Debug, Clone, PartialEq)]
pub struct OccurrenceMatrix {
    counts: Array2<u32>,
    vocabulary: Vocabulary,
    columns: Vec<Column>,
}

impl OccurrenceMatrix {
    /// rows = |vocabulary|
    #[inline]
    pub fn n_terms(&self) -> usize {
        self.counts.nrows()
    }

    /// cols = |corpus|
    #[inline]
    pub fn n_docs(&self) -> usize {
        self.counts.ncols()
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.counts.dim()
    }

    #[inline]
    pub fn get(&self, term: usize, doc: usize) -> Option<u32> {
        self.counts.get((term, doc)).copied()
    }

    pub fn counts(&self) -> &Array2<u32> {
        &self.counts
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// counts of one document
    pub fn column(&self, id: DocId) -> Option<ArrayView1<'_, u32>> {
        (id.0 < self.n_docs()).then(|| self.counts.column(id.0))
    }

    pub fn label(&self, id: DocId) -> Option<&str> {
        self.columns.get(id.0).map(|c| c.label.as_ref())
    }

    /// f64 copy for the decomposition
    pub fn to_f64(&self) -> Array2<f64> {
        self.counts.mapv(|c| c as f64)
    }
}

/// Build the occurrence matrix of a corpus
/// Documents are projected independently in parallel, then written into a
/// preallocated array. Column `j` is always corpus document `j`.
pub fn build_occurrence_matrix(corpus: &[Document], vocabulary: &Vocabulary) -> Result<OccurrenceMatrix> {
    if corpus.is_empty() {
        return Err(LsaError::EmptyCorpus);
    }
    if vocabulary.is_empty() {
        return Err(LsaError::EmptyVocabulary);
    }

    // collect は順序を保持する
    let embeddings: Vec<Embedding> = corpus
        .par_iter()
        .map(|doc| project(&doc.tokens, vocabulary))
        .collect();

    let mut counts = Array2::<u32>::zeros((vocabulary.len(), corpus.len()));
    for (j, embedding) in embeddings.iter().enumerate() {
        for (cell, count) in counts.column_mut(j).iter_mut().zip(embedding.as_slice()) {
            *cell = *count;
        }
    }
    let columns = corpus
        .iter()
        .enumerate()
        .map(|(j, doc)| Column {
            id: DocId(j),
            label: doc.label.clone(),
        })
        .collect();

    debug!(terms = vocabulary.len(), docs = corpus.len(), "built occurrence matrix");
    Ok(OccurrenceMatrix {
        counts,
        vocabulary: vocabulary.clone(),
        columns,
    })
}
