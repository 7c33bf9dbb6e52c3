//! Search Journey
//!
//! Load artifacts from disk, run queries, check ranking, snippets and tags.

use stacksearch_core::BlendWeights;
use stacksearch_e2e_tests::{FixtureFactory, QuestionFixture, TestArtifactDir};

// ============================================================================
// RANKING
// ============================================================================

#[test]
fn test_top_two_of_three_in_descending_order() {
    let dir = TestArtifactDir::new_temp();
    let engine = dir.load_engine();

    let response = engine.search("test query", 2);

    assert_eq!(response.results.len(), 2);
    assert_eq!(response.results[0].title, "Best match");
    assert_eq!(response.results[1].title, "Middle match");
    assert!(response.results[0].score > response.results[1].score);

    let boost = BlendWeights::default().boost(0.5, 0.2);
    assert!((response.results[0].score - 0.9 * boost).abs() < 1e-4);
    assert!((response.results[1].score - 0.5 * boost).abs() < 1e-4);
}

#[test]
fn test_more_results_than_corpus_returns_everything() {
    let engine = TestArtifactDir::new_temp().load_engine();
    let response = engine.search("test", 50);

    let titles: Vec<&str> = response.results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Best match", "Middle match", "Weak match"]);
}

#[test]
fn test_unknown_words_fall_back_to_corpus_order() {
    let items = vec![
        QuestionFixture::at_cosine(0, "First", 0.1),
        QuestionFixture::at_cosine(1, "Second", 0.9),
        QuestionFixture::at_cosine(2, "Third", 0.5),
    ];
    let engine = TestArtifactDir::with_corpus(&items).load_engine();

    let response = engine.search("completely unseen words", 3);
    let titles: Vec<&str> = response.results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);
    assert!(response.results.iter().all(|r| r.score == 0.0));
    assert!(response.tags.is_empty());
}

#[test]
fn test_popularity_reorders_close_matches() {
    let items = vec![
        QuestionFixture::at_cosine(0, "Slightly closer", 0.62),
        QuestionFixture::at_cosine(1, "Much more popular", 0.6).with_votes(900.0, 1.0),
    ];
    let engine = TestArtifactDir::with_corpus(&items).load_engine();

    let response = engine.search("test", 2);
    assert_eq!(response.results[0].title, "Much more popular");
    assert_eq!(response.results[0].votes, 900.0);
}

// ============================================================================
// SNIPPETS AND TAGS
// ============================================================================

#[test]
fn test_snippets_highlight_query_words() {
    let engine = TestArtifactDir::with_corpus(&FixtureFactory::programming_corpus()).load_engine();
    let response = engine.search("Python list", 1);

    let top = &response.results[0];
    assert_eq!(top.title, "Sort a list in Python");
    assert!(top.snippet.contains("<b style='color: #464646'>list</b>"));
    assert!(top.snippet.contains("<b style='color: #464646'>Python</b>"));
    assert!(top.snippet.contains("tuples"));
    assert!(!top.snippet.contains("<b style='color: #464646'>tuples</b>"));
}

#[test]
fn test_tags_predicted_from_query() {
    let engine = TestArtifactDir::new_temp().load_engine();

    assert_eq!(engine.search("python list", 1).tags, vec!["python"]);
    assert_eq!(engine.search("javascript promise", 1).tags, vec!["javascript"]);
    assert_eq!(
        engine.search("python or javascript", 1).tags,
        vec!["javascript", "python"]
    );
}

#[test]
fn test_concurrent_searches_share_one_engine() {
    let engine = std::sync::Arc::new(TestArtifactDir::new_temp().load_engine());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                let query = if i % 2 == 0 { "python test query" } else { "javascript test query" };
                (i, engine.search(query, 1))
            })
        })
        .collect();

    for handle in handles {
        let (i, response) = handle.join().unwrap();
        let expected = if i % 2 == 0 { "python" } else { "javascript" };
        assert_eq!(response.tags, vec![expected]);
        assert_eq!(response.results[0].title, "Best match");
    }
}
