// Sentiment traits: the lexicon seam and the scorer abstraction.
//
// PolarityLexicon is the external resource (token -> -1/0/+1). The
// SentimentScorer trait mirrors how the rest of the pipeline consumes
// per-text scores, so a model-based scorer could replace the lexicon one
// without touching the reporting code.

use crate::text::tokenizer::split_words;

/// Read-only token -> polarity lookup.
pub trait PolarityLexicon: Send + Sync {
    /// Polarity of a token (typically -1, 0, or +1), or `None` if unknown.
    fn polarity(&self, token: &str) -> Option<i8>;

    /// How this lexicon segments text into lookup tokens. Input is
    /// lowercased before it gets here.
    fn segment(&self, text: &str) -> Vec<String> {
        split_words(text).map(str::to_string).collect()
    }
}

/// Trait for scoring cleaned texts for sentiment polarity.
pub trait SentimentScorer: Send + Sync {
    /// Score one text. Result is in [-1, 1]; 0.0 means neutral or no signal.
    fn score_text(&self, text: &str) -> f64;

    /// Score multiple texts, returning results in the same order.
    fn score_batch(&self, texts: &[String]) -> Vec<f64> {
        texts.iter().map(|t| self.score_text(t)).collect()
    }
}
