// Word-embedding signals: the model seam, the word2vec loader, and
// TF-IDF-weighted document vectors.

pub mod similarity;
pub mod traits;
pub mod vectorizer;
pub mod word_vectors;
