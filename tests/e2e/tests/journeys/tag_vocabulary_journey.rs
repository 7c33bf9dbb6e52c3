//! Tag Vocabulary Journey
//!
//! Derive the tag vocabulary from the metadata table, write it, and load a
//! working engine from it.

use stacksearch_core::corpus::{read_metadata, split_tags};
use stacksearch_core::TagVocabulary;
use stacksearch_e2e_tests::{FixtureFactory, TestArtifactDir};

fn tag_lists(dir: &TestArtifactDir) -> Vec<Vec<String>> {
    read_metadata(&dir.paths().metadata)
        .unwrap()
        .iter()
        .map(|r| r.tags.as_deref().map(split_tags).unwrap_or_default())
        .collect()
}

#[test]
fn test_build_vocabulary_from_metadata() {
    let dir = TestArtifactDir::with_corpus(&FixtureFactory::programming_corpus());

    // python 2, list 2, javascript 2, sorting 1, promise 1, json 1
    let vocabulary = TagVocabulary::from_tag_lists(&tag_lists(&dir), 3).unwrap();
    assert_eq!(vocabulary.tags(), &["javascript", "list", "python"]);

    let all = TagVocabulary::from_tag_lists(&tag_lists(&dir), 500).unwrap();
    assert_eq!(all.len(), 6);
    assert!(all.tags().windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_written_vocabulary_drives_the_engine() {
    let dir = TestArtifactDir::with_corpus(&FixtureFactory::programming_corpus());

    // the fixture classifier has two outputs, so keep the two tags it was built for
    let lists = vec![vec!["python".to_string()], vec!["javascript".to_string()]];
    let vocabulary = TagVocabulary::from_tag_lists(&lists, 2).unwrap();
    vocabulary.save(&dir.paths().tag_vocabulary).unwrap();

    let engine = dir.load_engine();
    assert_eq!(engine.predict_tags("Python?"), vec!["python"]);
}

#[test]
fn test_vocabulary_size_must_match_classifier() {
    let dir = TestArtifactDir::with_corpus(&FixtureFactory::programming_corpus());
    let vocabulary = TagVocabulary::from_tag_lists(&tag_lists(&dir), 500).unwrap();
    vocabulary.save(&dir.paths().tag_vocabulary).unwrap();

    assert!(dir.try_load().is_err());
}
