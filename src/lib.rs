/// This crate is a Latent Semantic Analysis (LSA) engine for small corpora.
pub mod annotate;
pub mod config;
pub mod error;
pub mod utils;
pub mod vectorizer;

/// LSA Vectorizer
/// The top-level struct of this crate. It turns a corpus into a term × document
/// occurrence matrix, reduces it with a rank-k SVD, and scores queries against
/// the corpus in that latent space.
///
/// Internally, it holds:
/// - The annotator used for the corpus and for every query
/// - The annotated corpus
/// - The occurrence matrix and its vocabulary
/// - The rank-k decomposition (U, S, V)
///
/// `LsaVectorizer<A>` is generic over `A`, the NLP annotator (see `Annotator`).
///
/// # Thread Safety
/// Immutable after construction. Scoring takes `&self` and can run from many
/// threads; `similarity_batch` does so with rayon.
pub use vectorizer::LsaVectorizer;

/// Annotation seam
/// - `Annotator`: trait an external NLP service implements (tokens + POS tags, sentences)
/// - `LexiconAnnotator`: dictionary backed annotator for offline use and tests
/// - `Token`, `PosTag`, `PosFilter`, `Document`: annotated input types
pub use annotate::{lexicon::LexiconAnnotator, AnnotationError, Annotator, Document, PosFilter, PosTag, Token};

/// Engine configuration (rank, POS filter, keyword rounding, strict mode)
/// Loadable from TOML with `LsaConfig::from_toml_str`.
pub use config::LsaConfig;

/// Error type and result alias
pub use error::{LsaError, Result};

/// Pipeline stages as free functions
/// corpus -> `build_vocabulary` -> `build_occurrence_matrix` -> `reduce`
/// -> `score_similarity` -> `extract_keywords`
pub use vectorizer::{
    embedding::{project, Embedding},
    evaluate::{
        keyword::extract_keywords,
        scoring::{raw_similarity, score_similarity, HitEntry, Hits, SimilarityScores},
    },
    matrix::{build_occurrence_matrix, Column, DocId, OccurrenceMatrix},
    reduce::{reduce, Decomposition},
    vocabulary::{build_vocabulary, Vocabulary},
};
