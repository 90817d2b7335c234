// Word tokenizer with stop-word filtering.
//
// Letters and digits are word characters; everything else separates words.
// Repeated tokens are kept so that term frequencies stay meaningful.

use std::collections::HashSet;

/// Split text into word tokens on any non-alphanumeric character.
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
}

/// Tokenizer bound to one stop-word set.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stop_words: HashSet<String>,
}

impl Tokenizer {
    pub fn new(stop_words: HashSet<String>) -> Self {
        let stop_words = stop_words.into_iter().map(|w| w.to_lowercase()).collect();
        Self { stop_words }
    }

    pub fn stop_words(&self) -> &HashSet<String> {
        &self.stop_words
    }

    /// Lowercased, stop-word-free tokens in order of appearance.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        split_words(text)
            .map(str::to_lowercase)
            .filter(|token| !self.stop_words.contains(token))
            .collect()
    }
}
