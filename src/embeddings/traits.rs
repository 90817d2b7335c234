// Embedding model trait: the seam to whatever produced the word vectors.
//
// The engine never trains embeddings. It only asks a model for the vector of
// a token, and an unknown token is an ordinary `None`, not an error.

/// Read-only token -> fixed-width vector lookup.
pub trait EmbeddingModel: Send + Sync {
    /// Width of every vector this model returns.
    fn dimension(&self) -> usize;

    /// The vector for a token, or `None` if the model doesn't know it.
    fn vector(&self, token: &str) -> Option<&[f64]>;
}
