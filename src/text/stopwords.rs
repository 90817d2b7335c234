// Stop-word resource: per-language word lists.
//
// The built-in source wraps the `stop-words` crate. Its lists contain
// accented and apostrophized forms ("perché", "l'altro"); each entry is run
// through the normalizer and split, so the resulting set matches the tokens
// that actually come out of cleaned text.

use std::collections::HashSet;

use anyhow::Result;
use stop_words::{get, LANGUAGE};

use super::normalizer::{normalize, NormalizeOptions};
use super::tokenizer::split_words;

/// Trait for looking up the stop-word set for a language.
pub trait StopWordSource: Send + Sync {
    fn lookup(&self, language: &str) -> Result<HashSet<String>>;
}

/// Stop words bundled with the `stop-words` crate.
pub struct BuiltinStopWords;

impl BuiltinStopWords {
    fn language(code: &str) -> Result<LANGUAGE> {
        let language = match code.to_lowercase().as_str() {
            "it" | "italian" => LANGUAGE::Italian,
            "en" | "english" => LANGUAGE::English,
            "fr" | "french" => LANGUAGE::French,
            "de" | "german" => LANGUAGE::German,
            "es" | "spanish" => LANGUAGE::Spanish,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            other => anyhow::bail!(
                "Unsupported stop-word language '{}'. Use one of: it, en, fr, de, es, pt, nl",
                other
            ),
        };
        Ok(language)
    }
}

impl StopWordSource for BuiltinStopWords {
    fn lookup(&self, language: &str) -> Result<HashSet<String>> {
        let words: Vec<String> = get(Self::language(language)?);
        Ok(normalize_stop_words(&words))
    }
}

/// Map raw stop words into the cleaned-token space.
pub fn normalize_stop_words(words: &[String]) -> HashSet<String> {
    let options = NormalizeOptions::default();
    words
        .iter()
        .flat_map(|w| {
            let cleaned = normalize(w, &options);
            split_words(&cleaned)
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}
