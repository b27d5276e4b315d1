use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::annotate::{Document, PosFilter};

/// Ordered term list defining the rows of the occurrence matrix
///
/// Entries are NOT de-duplicated: a term seen N times as a noun in the corpus
/// occupies N rows, which weights it by its noun frequency.
/// Call `deduplicated()` for one row per distinct term.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: Vec<Box<str>>,
}

impl Vocabulary {
    /// Externally curated vocabulary, kept as given
    pub fn from_terms<T>(terms: &[T]) -> Self
    where
        T: AsRef<str>,
    {
        Self {
            terms: terms.iter().map(|t| Box::from(t.as_ref())).collect(),
        }
    }

    /// first occurrence order, one entry per distinct term
    pub fn deduplicated(&self) -> Self {
        let set: IndexSet<&str> = self.terms.iter().map(|t| t.as_ref()).collect();
        Self {
            terms: set.into_iter().map(Box::from).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.terms.get(idx).map(|t| t.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.terms.iter().map(|t| t.as_ref())
    }

    pub fn contains(&self, term: &str) -> bool {
        self.iter().any(|t| t == term)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }
}

/// Build the vocabulary of a corpus
/// Every token whose POS passes `pos_filter`, in encounter order across the
/// concatenated corpus, duplicates included.
/// An empty corpus or no matching token gives an empty vocabulary; the matrix
/// builder rejects it.
pub fn build_vocabulary(corpus: &[Document], pos_filter: &PosFilter) -> Vocabulary {
    let terms = corpus
        .iter()
        .flat_map(|doc| doc.filtered(pos_filter))
        .map(|token| Box::from(token.text.as_str()))
        .collect();
    Vocabulary { terms }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{PosTag, Token};

    fn doc(words: &[(&str, PosTag)]) -> Document {
        let label = words.iter().map(|(w, _)| *w).collect::<Vec<_>>().join(" ");
        Document::new(label, words.iter().map(|(w, p)| Token::new(*w, *p)).collect())
    }

    #[test]
    fn keeps_order_and_duplicates() {
        let corpus = vec![
            doc(&[("the", PosTag::Det), ("cat", PosTag::Noun), ("Alice", PosTag::Propn)]),
            doc(&[("a", PosTag::Det), ("cat", PosTag::Noun), ("runs", PosTag::Verb)]),
        ];
        let vocab = build_vocabulary(&corpus, &PosFilter::nouns());
        assert_eq!(vocab.to_vec(), vec!["cat", "Alice", "cat"]);
        assert_eq!(vocab.deduplicated().to_vec(), vec!["cat", "Alice"]);
    }

    #[test]
    fn filter_controls_membership() {
        let corpus = vec![doc(&[("runs", PosTag::Verb), ("cat", PosTag::Noun)])];
        let vocab = build_vocabulary(&corpus, &PosFilter::from_tags(&[PosTag::Verb]));
        assert_eq!(vocab.to_vec(), vec!["runs"]);
    }

    #[test]
    fn empty_inputs_give_empty_vocabulary() {
        assert!(build_vocabulary(&[], &PosFilter::nouns()).is_empty());
        let corpus = vec![doc(&[("runs", PosTag::Verb)])];
        assert!(build_vocabulary(&corpus, &PosFilter::nouns()).is_empty());
    }
}
