use serde::{Deserialize, Serialize};

use crate::{annotate::PosFilter, error::Result};

pub const DEFAULT_RANK: usize = 3;
pub const DEFAULT_KEYWORD_SCORE_PRECISION: u32 = 2;

/// Engine configuration
/// Every field has a default, so a partial TOML document is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LsaConfig {
    /// number of singular components kept (clamped to the matrix dimensions)
    pub rank: usize,
    /// POS tags admitted into the vocabulary and keyword output
    pub pos_filter: PosFilter,
    /// decimal places a score is rounded to before the keyword `> 0` test
    pub keyword_score_precision: u32,
    /// fail with `DegenerateQuery` instead of returning all-zero scores
    pub strict_degenerate_query: bool,
}

impl Default for LsaConfig {
    fn default() -> Self {
        Self {
            rank: DEFAULT_RANK,
            pos_filter: PosFilter::default(),
            keyword_score_precision: DEFAULT_KEYWORD_SCORE_PRECISION,
            strict_degenerate_query: false,
        }
    }
}

impl LsaConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_pos_filter(mut self, pos_filter: PosFilter) -> Self {
        self.pos_filter = pos_filter;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{annotate::PosTag, LsaError};

    #[test]
    fn defaults() {
        let config = LsaConfig::default();
        assert_eq!(config.rank, 3);
        assert_eq!(config.keyword_score_precision, 2);
        assert_eq!(config.pos_filter, PosFilter::nouns());
        assert!(!config.strict_degenerate_query);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = LsaConfig::from_toml_str("rank = 5\npos_filter = [\"NOUN\", \"VERB\"]\n").unwrap();
        assert_eq!(config.rank, 5);
        assert_eq!(config.pos_filter, PosFilter::from_tags(&[PosTag::Noun, PosTag::Verb]));
        assert_eq!(config.keyword_score_precision, 2);
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = LsaConfig::from_toml_str("rank = \"three\"").unwrap_err();
        assert!(matches!(err, LsaError::Config(_)));
    }
}
