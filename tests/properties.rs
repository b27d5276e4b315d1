use lsa_vectorizer::{
    build_occurrence_matrix, project, reduce, score_similarity, Document, PosTag, Token, Vocabulary,
};
use proptest::prelude::*;

const WORDS: [&str; 6] = ["alpha", "beta", "gamma", "delta", "eps", "zeta"];

fn doc_from(indices: &[usize]) -> Document {
    let words: Vec<&str> = indices.iter().map(|i| WORDS[*i]).collect();
    Document::new(
        words.join(" "),
        words.iter().map(|w| Token::new(*w, PosTag::Noun)).collect(),
    )
}

fn corpus_strategy() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::vec(0..WORDS.len(), 0..8), 1..6)
}

fn vocab_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..WORDS.len(), 1..7)
}

fn vocabulary(indices: &[usize]) -> Vocabulary {
    let terms: Vec<&str> = indices.iter().map(|i| WORDS[*i]).collect();
    Vocabulary::from_terms(&terms)
}

proptest! {
    #[test]
    fn matrix_has_vocabulary_rows_and_corpus_columns(docs in corpus_strategy(), vocab in vocab_strategy()) {
        let corpus: Vec<Document> = docs.iter().map(|d| doc_from(d)).collect();
        let vocabulary = vocabulary(&vocab);
        let matrix = build_occurrence_matrix(&corpus, &vocabulary).unwrap();
        prop_assert_eq!(matrix.shape(), (vocabulary.len(), corpus.len()));
    }

    #[test]
    fn embedding_sum_counts_vocabulary_hits(doc in prop::collection::vec(0..WORDS.len(), 0..12), vocab in vocab_strategy()) {
        let document = doc_from(&doc);
        let vocabulary = vocabulary(&vocab);
        let embedding = project(&document.tokens, &vocabulary);
        // 語彙の重複ぶんだけ数える
        let expected: u64 = vocabulary
            .iter()
            .map(|term| document.tokens.iter().filter(|t| t.text == term).count() as u64)
            .sum();
        prop_assert_eq!(embedding.total(), expected);
        prop_assert_eq!(embedding.len(), vocabulary.len());
    }

    #[test]
    fn verbatim_document_scores_highest(docs in corpus_strategy(), pick in any::<prop::sample::Index>()) {
        let corpus: Vec<Document> = docs.iter().map(|d| doc_from(d)).collect();
        let vocabulary = Vocabulary::from_terms(&WORDS);
        let matrix = build_occurrence_matrix(&corpus, &vocabulary).unwrap();
        let j = pick.index(corpus.len());
        prop_assume!(!docs[j].is_empty());

        let full = reduce(&matrix, usize::MAX).unwrap();
        let scores = score_similarity(&corpus[j], &matrix, &full).unwrap();
        let own = scores.as_slice()[j];
        prop_assert!((own - 1.0).abs() < 1e-6, "own score {}", own);
        for s in scores.as_slice() {
            prop_assert!(*s <= own + 1e-9);
        }
    }

    #[test]
    fn verbatim_document_scores_highest_at_truncated_rank(
        docs in corpus_strategy(),
        pick in any::<prop::sample::Index>(),
        rank in 1usize..=3,
    ) {
        let corpus: Vec<Document> = docs.iter().map(|d| doc_from(d)).collect();
        let vocabulary = Vocabulary::from_terms(&WORDS);
        let matrix = build_occurrence_matrix(&corpus, &vocabulary).unwrap();
        let j = pick.index(corpus.len());
        prop_assume!(!docs[j].is_empty());

        let decomposition = reduce(&matrix, rank).unwrap();
        // 残った成分で文書jが消えていないこと
        let row_norm = decomposition
            .v
            .row(j)
            .iter()
            .zip(decomposition.s.iter())
            .filter(|(_, sigma)| **sigma > 0.0)
            .map(|(v, _)| v * v)
            .sum::<f64>()
            .sqrt();
        prop_assume!(row_norm > 1e-6);

        let scores = score_similarity(&corpus[j], &matrix, &decomposition).unwrap();
        let own = scores.as_slice()[j];
        prop_assert!((own - 1.0).abs() < 1e-6, "own score {} at rank {}", own, rank);
        for s in scores.as_slice() {
            prop_assert!(*s <= own + 1e-9);
        }
    }

    #[test]
    fn clamped_rank_matches_max_rank(docs in corpus_strategy(), vocab in vocab_strategy(), extra in 1usize..10) {
        let corpus: Vec<Document> = docs.iter().map(|d| doc_from(d)).collect();
        let matrix = build_occurrence_matrix(&corpus, &vocabulary(&vocab)).unwrap();
        let max = matrix.n_terms().min(matrix.n_docs());
        prop_assert_eq!(reduce(&matrix, max + extra).unwrap(), reduce(&matrix, max).unwrap());
    }

    #[test]
    fn scores_are_finite_and_zero_without_overlap(docs in corpus_strategy(), rank in 1usize..6) {
        let corpus: Vec<Document> = docs.iter().map(|d| doc_from(d)).collect();
        let matrix = build_occurrence_matrix(&corpus, &Vocabulary::from_terms(&WORDS)).unwrap();
        let decomposition = reduce(&matrix, rank).unwrap();

        let stranger = Document::new("omega", vec![Token::new("omega", PosTag::Noun)]);
        let scores = score_similarity(&stranger, &matrix, &decomposition).unwrap();
        prop_assert!(scores.as_slice().iter().all(|s| *s == 0.0));

        for doc in &corpus {
            let scores = score_similarity(doc, &matrix, &decomposition).unwrap();
            prop_assert!(scores.as_slice().iter().all(|s| s.is_finite() && s.abs() <= 1.0 + 1e-9));
        }
    }
}
