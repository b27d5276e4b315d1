pub mod vocabulary;
pub mod embedding;
pub mod matrix;
pub mod reduce;
pub mod evaluate;

use rayon::prelude::*;
use tracing::info;

use crate::{
    annotate::{Annotator, Document},
    config::LsaConfig,
    error::{LsaError, Result},
    vectorizer::{
        embedding::{project, Embedding},
        evaluate::{
            keyword::extract_keywords_with_precision,
            scoring::{raw_similarity, score_embedding, SimilarityScores},
        },
        matrix::{build_occurrence_matrix, OccurrenceMatrix},
        reduce::{reduce, Decomposition},
        vocabulary::{build_vocabulary, Vocabulary},
    },
};

/// One LSA analysis session over an in-memory corpus
///
/// Holds:
/// - the annotator used for the corpus and every later query
/// - the annotated corpus, in input order
/// - the occurrence matrix (which owns the vocabulary)
/// - the rank-k decomposition built with `config.rank`
///
/// Everything is immutable after construction, so `&self` methods can be
/// called from many threads at once.
#[derive(Debug, Clone)]
pub struct LsaVectorizer<A>
where
    A: Annotator,
{
    annotator: A,
    config: LsaConfig,
    documents: Vec<Document>,
    matrix: OccurrenceMatrix,
    decomposition: Decomposition,
}

impl<A> LsaVectorizer<A>
where
    A: Annotator,
{
    /// Build a session; the vocabulary comes from the corpus and `config.pos_filter`
    pub fn new<T>(annotator: A, corpus: &[T], config: LsaConfig) -> Result<Self>
    where
        T: AsRef<str> + Sync,
    {
        let documents = annotate_corpus(&annotator, corpus)?;
        let vocabulary = build_vocabulary(&documents, &config.pos_filter);
        Self::assemble(annotator, documents, &vocabulary, config)
    }

    /// Build a session over an externally supplied vocabulary
    pub fn with_vocabulary<T>(annotator: A, corpus: &[T], vocabulary: &Vocabulary, config: LsaConfig) -> Result<Self>
    where
        T: AsRef<str> + Sync,
    {
        let documents = annotate_corpus(&annotator, corpus)?;
        Self::assemble(annotator, documents, vocabulary, config)
    }

    /// Build a session whose corpus is the sentences of one document
    pub fn from_sentences(annotator: A, text: &str, config: LsaConfig) -> Result<Self> {
        let sentences = annotator.sentences(text)?;
        Self::new(annotator, &sentences, config)
    }

    fn assemble(annotator: A, documents: Vec<Document>, vocabulary: &Vocabulary, config: LsaConfig) -> Result<Self> {
        let matrix = build_occurrence_matrix(&documents, vocabulary)?;
        let decomposition = reduce(&matrix, config.rank)?;
        info!(
            docs = documents.len(),
            terms = vocabulary.len(),
            rank = decomposition.rank,
            "lsa session ready"
        );
        Ok(Self {
            annotator,
            config,
            documents,
            matrix,
            decomposition,
        })
    }

    pub fn config(&self) -> &LsaConfig {
        &self.config
    }

    pub fn annotator(&self) -> &A {
        &self.annotator
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        self.matrix.vocabulary()
    }

    pub fn matrix(&self) -> &OccurrenceMatrix {
        &self.matrix
    }

    pub fn decomposition(&self) -> &Decomposition {
        &self.decomposition
    }

    pub fn doc_num(&self) -> usize {
        self.documents.len()
    }

    /// Decompose the same matrix at another rank
    pub fn reduce_to(&self, rank: usize) -> Result<Decomposition> {
        reduce(&self.matrix, rank)
    }

    /// term-frequency vector of arbitrary text over this vocabulary
    pub fn embed(&self, text: &str) -> Result<Embedding> {
        let tokens = self.annotator.annotate(text)?;
        Ok(project(&tokens, self.matrix.vocabulary()))
    }

    /// Latent-space cosine similarity of `query` to every corpus document
    /// Zero overlap gives all-zero scores, or `DegenerateQuery` in strict mode.
    pub fn similarity(&self, query: &str) -> Result<SimilarityScores> {
        let embedding = self.embed(query)?;
        if embedding.is_zero() && self.config.strict_degenerate_query {
            return Err(LsaError::DegenerateQuery);
        }
        score_embedding(&embedding, &self.matrix, &self.decomposition)
    }

    /// `similarity` against a decomposition of another rank
    pub fn similarity_with(&self, query: &str, decomposition: &Decomposition) -> Result<SimilarityScores> {
        let embedding = self.embed(query)?;
        if embedding.is_zero() && self.config.strict_degenerate_query {
            return Err(LsaError::DegenerateQuery);
        }
        score_embedding(&embedding, &self.matrix, decomposition)
    }

    /// Term-overlap dot product without the reduction
    pub fn raw_similarity(&self, query: &str) -> Result<SimilarityScores> {
        let query = Document::annotate(&self.annotator, query)?;
        Ok(raw_similarity(&query, &self.matrix))
    }

    /// Score several queries in parallel
    /// Results keep the order of `queries`.
    pub fn similarity_batch<T>(&self, queries: &[T]) -> Vec<Result<SimilarityScores>>
    where
        T: AsRef<str> + Sync,
    {
        queries
            .par_iter()
            .map(|q| self.similarity(q.as_ref()))
            .collect()
    }

    /// Keywords related to `query`
    /// Nouns and proper nouns (per `config.pos_filter`) of the documents that
    /// score above zero.
    pub fn keywords(&self, query: &str) -> Result<Vec<String>> {
        let scores = self.similarity(query)?;
        self.keywords_from_scores(&scores)
    }

    pub fn keywords_from_scores(&self, scores: &SimilarityScores) -> Result<Vec<String>> {
        extract_keywords_with_precision(
            &self.annotator,
            &self.matrix,
            scores,
            &self.config.pos_filter,
            self.config.keyword_score_precision,
        )
    }
}

/// annotate every corpus entry, order preserved
fn annotate_corpus<A, T>(annotator: &A, corpus: &[T]) -> Result<Vec<Document>>
where
    A: Annotator,
    T: AsRef<str> + Sync,
{
    if corpus.is_empty() {
        return Err(LsaError::EmptyCorpus);
    }
    let documents = corpus
        .par_iter()
        .map(|text| Document::annotate(annotator, text.as_ref()))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(documents)
}
