// Text processing: normalization, tokenization, and stop-word resources.

pub mod normalizer;
pub mod stopwords;
pub mod tokenizer;
