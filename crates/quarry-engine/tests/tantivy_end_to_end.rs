use quarry_core::traits::DocumentIndexer;
use quarry_core::types::{HighlightTier, NormalizedDocument, QueryShape, SearchStatus};
use quarry_engine::{EngineOptions, QueryEngine};
use quarry_text::{TantivyIndexer, TantivyProvider};

fn doc(id: &str, content: &str) -> NormalizedDocument {
    NormalizedDocument { doc_id: id.to_string(), content: content.to_string() }
}

fn engine_over(dir: &std::path::Path) -> QueryEngine<TantivyProvider> {
    let mut indexer = TantivyIndexer::create(dir).expect("indexer");
    indexer
        .index_documents(&[
            doc("D1", "the well known climate change report shows impact on coasts"),
            doc("D2", "a known well of water in the desert"),
            doc("D3", "climate scientists measure change and impact"),
            doc("D4", "cat and dog videos"),
        ])
        .expect("index");
    let provider = TantivyProvider::open(dir).expect("open");
    QueryEngine::new(provider, EngineOptions::default())
}

#[test]
fn mixed_query_ranks_exact_match_first_and_highlights_it() {
    let tmp = tempfile::tempdir().expect("tmp");
    let engine = engine_over(tmp.path());

    let out = engine.search(r#""climate change" impact"#, 3).expect("search");
    assert_eq!(out.shape, QueryShape::PhraseMixed);
    assert_eq!(out.status, SearchStatus::Complete);
    let ids: Vec<&str> = out.results.iter().map(|r| r.doc_id.as_str()).collect();
    assert_eq!(ids, vec!["D1", "D3"]);

    let top: Vec<_> = out.results[0].snippet.highlighted().collect();
    assert_eq!(top, vec![("climate change", HighlightTier::Phrase), ("impact", HighlightTier::FreeWord)]);

    // D3 has the words but not the phrase.
    let second: Vec<_> = out.results[1].snippet.highlighted().collect();
    assert_eq!(
        second,
        vec![
            ("climate", HighlightTier::PhraseWord),
            ("change", HighlightTier::PhraseWord),
            ("impact", HighlightTier::FreeWord),
        ]
    );
}

#[test]
fn hyphenated_query_only_matches_adjacent_words() {
    let tmp = tempfile::tempdir().expect("tmp");
    let engine = engine_over(tmp.path());

    let out = engine.search("well-known", 10).expect("search");
    assert_eq!(out.shape, QueryShape::Hyphen);
    assert_eq!(out.results.len(), 1);
    assert_eq!(out.results[0].doc_id, "D1");
}

#[test]
fn free_query_with_no_matches_is_empty_and_complete() {
    let tmp = tempfile::tempdir().expect("tmp");
    let engine = engine_over(tmp.path());

    let out = engine.search("volcano", 5).expect("search");
    assert_eq!(out.shape, QueryShape::Free);
    assert!(out.results.is_empty());
    assert_eq!(out.status, SearchStatus::Complete);
}

#[test]
fn stray_syntax_characters_do_not_lose_the_search() {
    let tmp = tempfile::tempdir().expect("tmp");
    let engine = engine_over(tmp.path());

    for raw in [r#""climate change" (impact"#, r#""climate change" impact)"#, r#""climate change" AND"#, r#""climate change" {impact}"#] {
        let out = engine.search(raw, 10).expect("search");
        assert_eq!(out.status, SearchStatus::Complete, "{raw}");
        assert_eq!(out.results.first().map(|r| r.doc_id.as_str()), Some("D1"), "{raw}");
    }

    for raw in ["impact:", "impact^", r"impact\"] {
        let out = engine.search(raw, 10).expect("search");
        assert_eq!(out.status, SearchStatus::Complete, "{raw}");
        let mut ids: Vec<&str> = out.results.iter().map(|r| r.doc_id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec!["D1", "D3"], "{raw}");
    }
}

#[test]
fn unpaired_quote_is_searched_as_plain_words() {
    let tmp = tempfile::tempdir().expect("tmp");
    let engine = engine_over(tmp.path());

    let out = engine.search(r#"climate "change"#, 10).expect("search");
    assert_eq!(out.shape, QueryShape::Free);
    assert_eq!(out.status, SearchStatus::Complete);
    let mut ids: Vec<&str> = out.results.iter().map(|r| r.doc_id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["D1", "D3"]);
}
