use indexmap::IndexMap;

use super::{AnnotationError, Annotator, PosTag, Token};

/// Dictionary backed annotator
/// Splits text into alphanumeric runs and single punctuation marks, then tags
/// each run from a surface -> POS table. Lookup is exact first, lowercase second.
/// Unknown words get `fallback` (default `X`), punctuation gets `PUNCT`.
///
/// Useful offline and in tests where a real tagging model is not available.
#[derive(Debug, Clone)]
pub struct LexiconAnnotator {
    lexicon: IndexMap<String, PosTag>,
    fallback: PosTag,
}

impl LexiconAnnotator {
    pub fn new() -> Self {
        Self {
            lexicon: IndexMap::new(),
            fallback: PosTag::X,
        }
    }

    /// tag used for words missing from the lexicon
    pub fn with_fallback(mut self, fallback: PosTag) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn insert(&mut self, surface: &str, pos: PosTag) -> &mut Self {
        self.lexicon.insert(surface.to_string(), pos);
        self
    }

    /// tag several surfaces at once
    pub fn insert_all<T>(&mut self, surfaces: &[T], pos: PosTag) -> &mut Self
    where
        T: AsRef<str>,
    {
        for surface in surfaces {
            self.insert(surface.as_ref(), pos);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    fn tag(&self, word: &str) -> PosTag {
        if let Some(pos) = self.lexicon.get(word) {
            return *pos;
        }
        self.lexicon
            .get(&word.to_lowercase())
            .copied()
            .unwrap_or(self.fallback)
    }
}

impl Default for LexiconAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

impl Annotator for LexiconAnnotator {
    fn annotate(&self, text: &str) -> Result<Vec<Token>, AnnotationError> {
        let mut tokens = Vec::new();
        let mut word_start: Option<usize> = None;
        for (idx, ch) in text.char_indices() {
            if ch.is_alphanumeric() || ch == '\'' || ch == '_' {
                word_start.get_or_insert(idx);
                continue;
            }
            if let Some(start) = word_start.take() {
                let word = &text[start..idx];
                tokens.push(Token::new(word, self.tag(word)));
            }
            if !ch.is_whitespace() {
                tokens.push(Token::new(ch.to_string(), PosTag::Punct));
            }
        }
        if let Some(start) = word_start {
            let word = &text[start..];
            tokens.push(Token::new(word, self.tag(word)));
        }
        Ok(tokens)
    }
}
