// Sentiment scoring: lexicon seam, TSV lexicon loader, and the scorer.

pub mod lexicon;
pub mod scorer;
pub mod traits;
