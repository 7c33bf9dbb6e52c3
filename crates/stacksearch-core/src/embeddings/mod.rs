//! Word Embeddings Module
//!
//! Pretrained word-vector lookup and query vectorization.
//!
//! Supports:
//! - Loading a word2vec text export into an immutable table
//! - Averaging query words into a single query vector
//! - Cosine similarity computation

mod similarity;
mod table;
mod vectorize;

pub use similarity::{cosine_similarity, cosine_with_norms, dot_product, l2_norm};
pub use table::{EmbeddingError, EmbeddingTable};
pub use vectorize::vectorize;
