//! Startup failure modes
//!
//! Every broken artifact must stop the load with an error naming the problem.

use stacksearch_core::LoadError;
use stacksearch_e2e_tests::{FixtureFactory, TestArtifactDir};

fn load_error(dir: &TestArtifactDir) -> LoadError {
    match dir.try_load() {
        Ok(_) => panic!("load should have failed"),
        Err(e) => e,
    }
}

#[test]
fn test_missing_artifacts_are_listed() {
    let dir = TestArtifactDir::empty();
    match load_error(&dir) {
        LoadError::Missing(missing) => {
            let names: Vec<&str> = missing.iter().map(|(name, _)| *name).collect();
            assert!(names.contains(&"metadata"));
            assert!(names.contains(&"word vectors"));
            assert_eq!(names.len(), 6);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_row_count_mismatch() {
    let dir = TestArtifactDir::new_temp();
    dir.write_title_embeddings(&[vec![1.0, 0.0], vec![0.0, 1.0]]);
    assert!(matches!(load_error(&dir), LoadError::Corpus { .. }));
}

#[test]
fn test_non_numeric_embedding_cell() {
    let dir = TestArtifactDir::new_temp();
    dir.overwrite(&dir.paths().title_embeddings, "0,1\n0.9,abc\n0.5,0.8\n0.1,0.9\n");
    let message = load_error(&dir).to_string();
    assert!(message.contains("abc"), "{}", message);
}

#[test]
fn test_word_vector_dimension_mismatch() {
    let dir = TestArtifactDir::new_temp();
    dir.overwrite(&dir.paths().word_vectors, "test 1.0 0.0\nquery 1.0 0.0 0.0\n");
    assert!(matches!(load_error(&dir), LoadError::WordVectors { .. }));
}

#[test]
fn test_word_vectors_in_other_space() {
    let dir = TestArtifactDir::new_temp();
    dir.overwrite(&dir.paths().word_vectors, "test 1.0 0.0 0.0\n");
    assert!(matches!(load_error(&dir), LoadError::DimensionMismatch { .. }));
}

#[test]
fn test_invalid_classifier_json() {
    let dir = TestArtifactDir::new_temp();
    dir.overwrite(&dir.paths().classifier, "{\"embedding\": []}");
    assert!(matches!(
        load_error(&dir),
        LoadError::Tagging { artifact: "classifier", .. }
    ));
}

#[test]
fn test_tokenizer_exceeds_classifier_vocabulary() {
    let dir = TestArtifactDir::new_temp();
    let mut model = FixtureFactory::tag_model();
    model.tokenizer.word_index.insert("rust".to_string(), 9);
    dir.write_tag_model(&model);
    assert!(matches!(load_error(&dir), LoadError::TagModel(_)));
}
