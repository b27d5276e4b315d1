use crate::annotate::AnnotationError;

/// Errors raised by the LSA engine
#[derive(Debug, thiserror::Error)]
pub enum LsaError {
    /// vocabulary has zero terms after POS filtering
    #[error("vocabulary is empty: supply more text or relax the POS filter")]
    EmptyVocabulary,

    /// corpus has zero documents
    #[error("corpus is empty")]
    EmptyCorpus,

    /// a zero dimensional semantic space was requested
    #[error("invalid rank {requested}: rank must be at least 1")]
    InvalidRank { requested: usize },

    /// query shares no term with the vocabulary (strict mode only)
    #[error("query shares no term with the vocabulary")]
    DegenerateQuery,

    /// decomposition and matrix do not describe the same space
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// annotator failure, passed through untouched
    #[error(transparent)]
    Annotation(#[from] AnnotationError),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, LsaError>;
