pub mod lexicon;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Error type produced by an external annotator
/// The engine never inspects or retries it; it surfaces as `LsaError::Annotation`.
pub type AnnotationError = Box<dyn std::error::Error + Send + Sync>;

/// Universal part-of-speech tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum PosTag {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
    Space,
}

impl PosTag {
    pub const ALL: [PosTag; 18] = [
        PosTag::Adj, PosTag::Adp, PosTag::Adv, PosTag::Aux, PosTag::Cconj, PosTag::Det,
        PosTag::Intj, PosTag::Noun, PosTag::Num, PosTag::Part, PosTag::Pron, PosTag::Propn,
        PosTag::Punct, PosTag::Sconj, PosTag::Sym, PosTag::Verb, PosTag::X, PosTag::Space,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PosTag::Adj => "ADJ",
            PosTag::Adp => "ADP",
            PosTag::Adv => "ADV",
            PosTag::Aux => "AUX",
            PosTag::Cconj => "CCONJ",
            PosTag::Det => "DET",
            PosTag::Intj => "INTJ",
            PosTag::Noun => "NOUN",
            PosTag::Num => "NUM",
            PosTag::Part => "PART",
            PosTag::Pron => "PRON",
            PosTag::Propn => "PROPN",
            PosTag::Punct => "PUNCT",
            PosTag::Sconj => "SCONJ",
            PosTag::Sym => "SYM",
            PosTag::Verb => "VERB",
            PosTag::X => "X",
            PosTag::Space => "SPACE",
        }
    }

    #[inline]
    fn bit(self) -> u32 {
        1 << (self as u8)
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown part-of-speech tag: {0}")]
pub struct UnknownPosTag(pub String);

impl FromStr for PosTag {
    type Err = UnknownPosTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PosTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPosTag(s.to_string()))
    }
}

/// Set of POS tags a token must belong to
/// One bit per tag, so membership is a single mask test.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PosTag>", into = "Vec<PosTag>")]
pub struct PosFilter {
    mask: u32,
}

impl PosFilter {
    /// filter matching nothing
    pub const fn empty() -> Self {
        Self { mask: 0 }
    }

    /// proper nouns and common nouns
    pub fn nouns() -> Self {
        Self::from_tags(&[PosTag::Propn, PosTag::Noun])
    }

    pub fn from_tags(tags: &[PosTag]) -> Self {
        let mut filter = Self::empty();
        for tag in tags {
            filter.insert(*tag);
        }
        filter
    }

    #[inline]
    pub fn insert(&mut self, tag: PosTag) -> &mut Self {
        self.mask |= tag.bit();
        self
    }

    #[inline]
    pub fn contains(&self, tag: PosTag) -> bool {
        self.mask & tag.bit() != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// tags in declaration order
    pub fn tags(&self) -> Vec<PosTag> {
        PosTag::ALL.iter().copied().filter(|t| self.contains(*t)).collect()
    }
}

impl Default for PosFilter {
    fn default() -> Self {
        Self::nouns()
    }
}

impl From<Vec<PosTag>> for PosFilter {
    fn from(tags: Vec<PosTag>) -> Self {
        Self::from_tags(&tags)
    }
}

impl From<PosFilter> for Vec<PosTag> {
    fn from(filter: PosFilter) -> Self {
        filter.tags()
    }
}

impl fmt::Debug for PosFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.tags()).finish()
    }
}

/// Annotated token: surface text plus POS tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub pos: PosTag,
}

impl Token {
    pub fn new(text: impl Into<String>, pos: PosTag) -> Self {
        Self { text: text.into(), pos }
    }
}

/// A corpus member or query after annotation
/// `label` is the raw text the tokens came from; it doubles as the matrix column label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub label: Box<str>,
    pub tokens: Vec<Token>,
}

impl Document {
    pub fn new(label: impl Into<Box<str>>, tokens: Vec<Token>) -> Self {
        Self { label: label.into(), tokens }
    }

    /// Annotate raw text into a document
    pub fn annotate<A>(annotator: &A, text: &str) -> Result<Self, AnnotationError>
    where
        A: Annotator + ?Sized,
    {
        Ok(Self::new(text, annotator.annotate(text)?))
    }

    /// tokens passing the filter, in document order
    pub fn filtered<'a>(&'a self, filter: &'a PosFilter) -> impl Iterator<Item = &'a Token> + 'a {
        self.tokens.iter().filter(move |t| filter.contains(t.pos))
    }
}

/// NLP annotation seam
/// Implementors turn raw text into ordered tokens with POS tags.
/// Must be pure with respect to its input; the engine may call it from several threads.
pub trait Annotator: Send + Sync {
    fn annotate(&self, text: &str) -> Result<Vec<Token>, AnnotationError>;

    /// Split a document into sentences
    /// Default cuts after `.`, `!` or `?` followed by whitespace or the end of text,
    /// so "3.14" stays whole. Abbreviations such as "U.S." followed by a space still
    /// end a sentence; annotators with a real segmenter should override this.
    fn sentences(&self, text: &str) -> Result<Vec<String>, AnnotationError> {
        let mut sentences = Vec::new();
        let mut start = 0;
        let mut chars = text.char_indices().peekable();
        while let Some((idx, ch)) = chars.next() {
            if !matches!(ch, '.' | '!' | '?') {
                continue;
            }
            let at_boundary = match chars.peek() {
                Some((_, next)) => next.is_whitespace(),
                None => true,
            };
            if at_boundary {
                let end = idx + ch.len_utf8();
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_string());
                }
                start = end;
            }
        }
        let rest = text[start..].trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }
        Ok(sentences)
    }
}

impl<A> Annotator for &A
where
    A: Annotator + ?Sized,
{
    fn annotate(&self, text: &str) -> Result<Vec<Token>, AnnotationError> {
        (**self).annotate(text)
    }

    fn sentences(&self, text: &str) -> Result<Vec<String>, AnnotationError> {
        (**self).sentences(text)
    }
}
