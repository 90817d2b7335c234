// Descriptive statistics per entity over the raw texts.
//
// Lengths are in characters, not bytes. Noise counts use the same patterns
// the normalizer strips, so a link only counts when it starts with "http://",
// "https://" or "www". A bare word like "httpserver" is not a link here.

use serde::Serialize;

use crate::corpus::{Corpus, EntityMap};
use crate::text::normalizer::NoiseClass;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveStats {
    pub texts: usize,
    /// `None` when the entity has no texts.
    pub average_length: Option<f64>,
    pub longest_length: Option<usize>,
    pub shortest_length: Option<usize>,
    pub links: usize,
    pub hashtags: usize,
    pub mentions: usize,
}

impl DescriptiveStats {
    pub fn from_texts(texts: &[String]) -> Self {
        let lengths: Vec<usize> = texts.iter().map(|t| t.chars().count()).collect();
        let average_length = if lengths.is_empty() {
            None
        } else {
            Some(lengths.iter().sum::<usize>() as f64 / lengths.len() as f64)
        };
        let count = |class: NoiseClass| -> usize { texts.iter().map(|t| class.count(t)).sum() };

        Self {
            texts: texts.len(),
            average_length,
            longest_length: lengths.iter().max().copied(),
            shortest_length: lengths.iter().min().copied(),
            links: count(NoiseClass::Link),
            hashtags: count(NoiseClass::Hashtag),
            mentions: count(NoiseClass::Mention),
        }
    }
}

pub fn describe_corpus(corpus: &Corpus) -> EntityMap<DescriptiveStats> {
    corpus
        .by_entity()
        .map(|_, texts| DescriptiveStats::from_texts(texts))
}
