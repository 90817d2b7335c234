// Document vectors: TF-IDF-weighted average of word embeddings.
//
// For each token the model knows, its vector is weighted by the entity's
// TF-IDF weight for that token. Tokens with no TF-IDF entry (stop words
// dropped by the ceiling, terms only the embedding model knows) get a small
// fallback weight instead. The fallback is applied on absence, not on 0.0:
// a genuine 0.0 weight is kept and silences the token.
//
// Tokens missing from the model are skipped outright. A text where no token
// has a vector comes back as the zero vector.

use std::collections::BTreeMap;

use anyhow::Result;

use super::traits::EmbeddingModel;

/// Default weight for tokens with no TF-IDF entry. Real weights are at
/// least ln(N / (N - 1)), which stays above 0.05 for any corpus of up to
/// twenty entities.
pub const DEFAULT_FALLBACK_WEIGHT: f64 = 1e-4;

/// Check a fallback weight without needing a model.
pub fn validate_fallback_weight(fallback_weight: f64) -> Result<()> {
    if !fallback_weight.is_finite() || fallback_weight <= 0.0 {
        anyhow::bail!(
            "Fallback weight must be a finite positive number (got {})",
            fallback_weight
        );
    }
    Ok(())
}

/// Builds one fixed-width vector per text.
pub struct DocumentVectorizer<'a> {
    model: &'a dyn EmbeddingModel,
    fallback_weight: f64,
}

impl<'a> DocumentVectorizer<'a> {
    /// Fails if the fallback weight isn't a finite, strictly positive number.
    pub fn new(model: &'a dyn EmbeddingModel, fallback_weight: f64) -> Result<Self> {
        validate_fallback_weight(fallback_weight)?;
        Ok(Self {
            model,
            fallback_weight,
        })
    }

    pub fn dimension(&self) -> usize {
        self.model.dimension()
    }

    pub fn fallback_weight(&self) -> f64 {
        self.fallback_weight
    }

    pub fn zero_vector(&self) -> Vec<f64> {
        vec![0.0; self.model.dimension()]
    }

    /// Weighted average of the token vectors.
    ///
    /// `weights` is the entity's row of the TF-IDF table.
    pub fn vectorize(&self, tokens: &[String], weights: &BTreeMap<String, f64>) -> Vec<f64> {
        let dim = self.model.dimension();
        let mut sum = vec![0.0_f64; dim];
        let mut weight_sum = 0.0_f64;
        let mut embedded = 0usize;

        for token in tokens {
            let Some(vector) = self.model.vector(token) else {
                continue;
            };
            let weight = weights
                .get(token)
                .copied()
                .unwrap_or(self.fallback_weight)
                .max(0.0);

            embedded += 1;
            weight_sum += weight;
            for (acc, &v) in sum.iter_mut().zip(vector) {
                *acc += v * weight;
            }
        }

        // No embedded tokens, or all of them carried a 0.0 weight: there is
        // no average to take.
        if embedded == 0 || weight_sum <= 0.0 {
            return self.zero_vector();
        }

        for val in &mut sum {
            *val /= weight_sum;
        }
        sum
    }
}

/// True if every component is exactly 0.0.
pub fn is_zero_vector(vector: &[f64]) -> bool {
    vector.iter().all(|&v| v == 0.0)
}
