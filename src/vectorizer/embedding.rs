use std::ops::Index;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{annotate::Token, vectorizer::vocabulary::Vocabulary};

/// Term-frequency vector of one document over a fixed vocabulary
/// `counts[i]` is how often vocabulary entry `i` occurs in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embedding {
    counts: Vec<u32>,
}

impl Embedding {
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }

    /// sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| *c as u64).sum()
    }

    /// true when the document shares no term with the vocabulary
    pub fn is_zero(&self) -> bool {
        self.counts.iter().all(|c| *c == 0)
    }

    /// counts as f64, for the numeric side
    pub fn iter_f64(&self) -> impl Iterator<Item = f64> + '_ {
        self.counts.iter().map(|c| *c as f64)
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.counts
    }
}

impl Index<usize> for Embedding {
    type Output = u32;

    fn index(&self, idx: usize) -> &u32 {
        &self.counts[idx]
    }
}

/// Project a document's tokens onto the vocabulary
/// Case-sensitive exact match on surface text, no stemming.
/// Duplicate vocabulary entries each get the full count of their term.
pub fn project(tokens: &[Token], vocabulary: &Vocabulary) -> Embedding {
    // トークン出現回数のマップを先に作る O(|tokens| + |vocab|)
    let mut token_count: IndexMap<&str, u32> = IndexMap::with_capacity(tokens.len());
    for token in tokens {
        *token_count.entry(token.text.as_str()).or_insert(0) += 1;
    }
    let counts = vocabulary
        .iter()
        .map(|term| token_count.get(term).copied().unwrap_or(0))
        .collect();
    Embedding { counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::PosTag;

    fn tokens(words: &[&str]) -> Vec<Token> {
        words.iter().map(|w| Token::new(*w, PosTag::X)).collect()
    }

    #[test]
    fn counts_each_vocabulary_term() {
        let vocab = Vocabulary::from_terms(&["cat", "dog", "bird"]);
        let emb = project(&tokens(&["cat", "and", "cat", "dog"]), &vocab);
        assert_eq!(emb.as_slice(), &[2, 1, 0]);
        assert_eq!(emb.total(), 3);
    }

    #[test]
    fn match_is_case_sensitive() {
        let vocab = Vocabulary::from_terms(&["Cat"]);
        let emb = project(&tokens(&["cat", "CAT"]), &vocab);
        assert!(emb.is_zero());
        assert_eq!(emb.len(), 1);
    }

    #[test]
    fn duplicated_terms_repeat_the_count() {
        let vocab = Vocabulary::from_terms(&["cat", "dog", "cat"]);
        let emb = project(&tokens(&["cat", "cat"]), &vocab);
        assert_eq!(emb.as_slice(), &[2, 0, 2]);
    }

    #[test]
    fn no_overlap_is_zero_vector() {
        let vocab = Vocabulary::from_terms(&["cat"]);
        let emb = project(&tokens(&["dog"]), &vocab);
        assert_eq!(emb.as_slice(), &[0]);
        assert!(emb.is_zero());
    }
}
