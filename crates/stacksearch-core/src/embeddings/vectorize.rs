//! Query Vectorization
//!
//! Averages the word vectors of a query into a single fixed-dimension vector.
//! Words missing from the table are skipped; a query with no known words
//! produces the zero vector, which scores every corpus item at zero.

use super::EmbeddingTable;

/// Average the embeddings of the whitespace-separated words in `text`
///
/// Returns a vector of length `dim`. When no word is present in the table,
/// the result is all zeros rather than an error.
pub fn vectorize(text: &str, embeddings: &EmbeddingTable, dim: usize) -> Vec<f32> {
    let mut sum = vec![0.0_f32; dim];
    let mut valid_words = 0_usize;

    for word in text.split_whitespace() {
        let Some(vector) = embeddings.get(word) else {
            continue;
        };
        if vector.len() != dim {
            continue;
        }
        for (acc, val) in sum.iter_mut().zip(vector) {
            *acc += val;
        }
        valid_words += 1;
    }

    if valid_words > 0 {
        let count = valid_words as f32;
        for val in &mut sum {
            *val /= count;
        }
    }

    sum
}

// ============================================================================
// TESTS
// ============================================================================
