// Centroids and cosine similarity over document vectors.
//
// Used by the vector report: each entity's centroid is the mean of its
// non-zero document vectors, and centroids are compared pairwise.

/// Mean of a set of equal-width vectors, or `None` for an empty set.
pub fn mean_vector(vectors: &[&[f64]]) -> Option<Vec<f64>> {
    let first = vectors.first()?;
    let dim = first.len();
    let n = vectors.len() as f64;

    let mut mean = vec![0.0_f64; dim];
    for vector in vectors {
        debug_assert_eq!(vector.len(), dim, "document vectors must share a width");
        for (acc, &val) in mean.iter_mut().zip(vector.iter()) {
            *acc += val;
        }
    }
    for val in &mut mean {
        *val /= n;
    }
    Some(mean)
}

/// Cosine similarity in [-1, 1].
///
/// Returns 0.0 for mismatched widths, empty input, or a zero-magnitude side.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_vector() {
        let a = [1.0, 0.0, 2.0];
        let b = [0.0, 1.0, 0.0];
        let mean = mean_vector(&[&a[..], &b[..]]).unwrap();
        assert_eq!(mean, vec![0.5, 0.5, 1.0]);
    }

    #[test]
    fn test_mean_vector_empty() {
        assert_eq!(mean_vector(&[]), None);
    }

    #[test]
    fn test_cosine_identical() {
        let a = [1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_opposite_is_negative() {
        let a = [1.0, 0.0];
        let b = [-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_cosine_is_symmetric() {
        let a = [1.0, 3.0, -2.0, 0.5];
        let b = [2.0, -1.0, 4.0, 0.0];
        assert!((cosine_similarity(&a, &b) - cosine_similarity(&b, &a)).abs() < 1e-10);
    }
}
