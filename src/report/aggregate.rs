// Per-entity summaries of per-text signals.
//
// Sentiment scores become negative/neutral/positive shares per entity.
// Document vectors are filtered down to the ones worth projecting (zero
// vectors carry no information), with a centroid per entity and pairwise
// centroid similarities.

use serde::Serialize;
use tracing::debug;

use crate::corpus::{Entity, EntityMap};
use crate::embeddings::similarity::{cosine_similarity, mean_vector};
use crate::embeddings::vectorizer::is_zero_vector;

/// Sentiment distribution for one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SentimentShares {
    /// The entity has no texts; shares are undefined.
    NoData,
    Shares {
        texts: usize,
        negative: f64,
        neutral: f64,
        positive: f64,
    },
}

/// Fraction of each entity's texts scoring below, at, and above zero.
pub fn sentiment_shares(scores: &EntityMap<Vec<f64>>) -> EntityMap<SentimentShares> {
    scores.map(|_, scores| {
        let total = scores.len();
        if total == 0 {
            return SentimentShares::NoData;
        }
        let negative = scores.iter().filter(|&&s| s < 0.0).count();
        let positive = scores.iter().filter(|&&s| s > 0.0).count();
        let neutral = total - negative - positive;

        let total = total as f64;
        SentimentShares::Shares {
            texts: scores.len(),
            negative: negative as f64 / total,
            neutral: neutral as f64 / total,
            positive: positive as f64 / total,
        }
    })
}

/// A non-zero document vector, ready for an external 2-D projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionPoint {
    pub entity: Entity,
    /// Position of the source text within the entity's texts.
    pub text_index: usize,
    pub vector: Vec<f64>,
}

/// Cosine similarity between two entity centroids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentroidSimilarity {
    pub a: Entity,
    pub b: Entity,
    pub cosine: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VectorSummary {
    /// Non-zero vectors in corpus order (entity, then text index).
    pub points: Vec<ProjectionPoint>,
    /// Mean of each entity's non-zero vectors; `None` when it has none.
    pub centroids: EntityMap<Option<Vec<f64>>>,
    /// Every pair of entities that both have a centroid.
    pub similarities: Vec<CentroidSimilarity>,
    /// How many zero vectors were filtered out.
    pub zero_vectors_dropped: usize,
}

/// Drop zero vectors and summarize what's left.
pub fn summarize_vectors(vectors: &EntityMap<Vec<Vec<f64>>>) -> VectorSummary {
    let mut points = Vec::new();
    let mut zero_vectors_dropped = 0;

    for (entity, entity_vectors) in vectors.iter() {
        for (text_index, vector) in entity_vectors.iter().enumerate() {
            if is_zero_vector(vector) {
                zero_vectors_dropped += 1;
                continue;
            }
            points.push(ProjectionPoint {
                entity: entity.clone(),
                text_index,
                vector: vector.clone(),
            });
        }
    }

    let centroids = vectors.map(|_, entity_vectors| {
        let kept: Vec<&[f64]> = entity_vectors
            .iter()
            .filter(|v| !is_zero_vector(v))
            .map(Vec::as_slice)
            .collect();
        mean_vector(&kept)
    });

    let with_centroid: Vec<(&Entity, &Vec<f64>)> = centroids
        .iter()
        .filter_map(|(entity, centroid)| centroid.as_ref().map(|c| (entity, c)))
        .collect();
    let mut similarities = Vec::new();
    for (i, (a, ca)) in with_centroid.iter().enumerate() {
        for (b, cb) in &with_centroid[i + 1..] {
            similarities.push(CentroidSimilarity {
                a: (*a).clone(),
                b: (*b).clone(),
                cosine: cosine_similarity(ca, cb),
            });
        }
    }

    debug!(
        points = points.len(),
        dropped = zero_vectors_dropped,
        "Summarized document vectors"
    );

    VectorSummary {
        points,
        centroids,
        similarities,
        zero_vectors_dropped,
    }
}
