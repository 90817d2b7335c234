// Topic signals: mega-documents, TF-IDF weighting, and keyword ranking.

pub mod keywords;
pub mod megadoc;
pub mod tfidf;
