//! Text Preprocessing Module
//!
//! Query cleaning is a pluggable collaborator: the search pipeline only
//! depends on the [`Preprocessor`] trait. [`TextCleaner`] is the default.

mod preprocess;

pub use preprocess::{preprocess_text, Preprocessor, TextCleaner};
