// Lexicon-based sentiment scoring.
//
// A text's score is the mean polarity of its tokens that carry one. Tokens
// the lexicon doesn't know, and tokens with polarity 0, don't count. A text
// with no polarized tokens scores 0.0.

use super::traits::{PolarityLexicon, SentimentScorer};

/// Scores texts against a polarity lexicon.
pub struct LexiconScorer<'a> {
    lexicon: &'a dyn PolarityLexicon,
}

impl<'a> LexiconScorer<'a> {
    pub fn new(lexicon: &'a dyn PolarityLexicon) -> Self {
        Self { lexicon }
    }
}

impl SentimentScorer for LexiconScorer<'_> {
    fn score_text(&self, text: &str) -> f64 {
        // Some lexicon backends reject empty input; never hand them one.
        if text.trim().is_empty() {
            return 0.0;
        }

        let tokens = self.lexicon.segment(&text.to_lowercase());
        let polarities: Vec<f64> = tokens
            .iter()
            .filter_map(|token| self.lexicon.polarity(token))
            .filter(|&p| p != 0)
            .map(f64::from)
            .collect();

        if polarities.is_empty() {
            0.0
        } else {
            polarities.iter().sum::<f64>() / polarities.len() as f64
        }
    }
}
