//! Query text cleaning

use std::sync::LazyLock;

use regex::Regex;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid html tag pattern"));

// Keeps `#` and `+` so tokens like `c#` and `c++` survive
static NON_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}#+\s]+").expect("valid token pattern"));

/// Turns raw user text into the normalized form the models were trained on
pub trait Preprocessor: Send + Sync {
    /// Clean `text`, returning space-separated lowercase tokens
    fn preprocess(&self, text: &str) -> String;
}

/// Default cleaner: HTML strip, lowercase, punctuation removal, whitespace collapse
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCleaner;

impl TextCleaner {
    pub fn new() -> Self {
        Self
    }
}

impl Preprocessor for TextCleaner {
    fn preprocess(&self, text: &str) -> String {
        preprocess_text(text)
    }
}

/// Clean a piece of text with the default rules
pub fn preprocess_text(text: &str) -> String {
    let without_html = HTML_TAG.replace_all(text, " ");
    let lowered = without_html.to_lowercase();
    let tokens_only = NON_TOKEN.replace_all(&lowered, " ");
    tokens_only.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_collapses_whitespace() {
        assert_eq!(preprocess_text("  How   to SORT\ta List "), "how to sort a list");
    }

    #[test]
    fn test_strips_html_and_punctuation() {
        assert_eq!(
            preprocess_text("<p>What's a <code>dict</code>?</p>"),
            "what s a dict"
        );
    }

    #[test]
    fn test_keeps_language_symbols() {
        assert_eq!(preprocess_text("C# vs C++!"), "c# vs c++");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(preprocess_text(""), "");
        assert_eq!(preprocess_text("?!..."), "");
    }

    #[test]
    fn test_trait_object_dispatch() {
        let cleaner: Box<dyn Preprocessor> = Box::new(TextCleaner::new());
        assert_eq!(cleaner.preprocess("Python LIST"), "python list");
    }
}
