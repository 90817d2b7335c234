// Unit tests for document vectors and their summaries.

use std::collections::BTreeMap;

use ember::corpus::{Entity, EntityMap};
use ember::embeddings::similarity::{cosine_similarity, mean_vector};
use ember::embeddings::vectorizer::{is_zero_vector, DocumentVectorizer, DEFAULT_FALLBACK_WEIGHT};
use ember::embeddings::word_vectors::WordVectors;
use ember::report::aggregate::summarize_vectors;

fn model() -> WordVectors {
    WordVectors::from_reader(
        "3 3\n\
         governo 1.0 0.0 0.0\n\
         scuola 0.0 1.0 0.0\n\
         europa 0.0 0.0 1.0\n"
            .as_bytes(),
    )
    .unwrap()
}

fn tokens(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

// ============================================================
// Vectorizer
// ============================================================

#[test]
fn empty_text_gives_zero_vector_of_model_width() {
    let m = model();
    let v = DocumentVectorizer::new(&m, DEFAULT_FALLBACK_WEIGHT).unwrap();
    let out = v.vectorize(&[], &BTreeMap::new());
    assert_eq!(out.len(), 3);
    assert!(is_zero_vector(&out));
}

#[test]
fn unknown_token_is_skipped_silently() {
    let m = model();
    let v = DocumentVectorizer::new(&m, DEFAULT_FALLBACK_WEIGHT).unwrap();
    let weights: BTreeMap<String, f64> = [("scuola".to_string(), 2.0)].into();

    let with_unknown = v.vectorize(&tokens(&["pippo", "scuola"]), &weights);
    let without = v.vectorize(&tokens(&["scuola"]), &weights);
    assert_eq!(with_unknown, without);
    assert_eq!(without, vec![0.0, 1.0, 0.0]);
}

#[test]
fn fallback_weight_is_small_next_to_real_weights() {
    let m = model();
    let v = DocumentVectorizer::new(&m, DEFAULT_FALLBACK_WEIGHT).unwrap();
    let weights: BTreeMap<String, f64> = [("governo".to_string(), 1.0)].into();

    let out = v.vectorize(&tokens(&["governo", "europa"]), &weights);
    assert!(out[0] > 0.99);
    assert!(out[2] > 0.0 && out[2] < 0.01);
}

#[test]
fn all_zero_weights_give_zero_vector() {
    let m = model();
    let v = DocumentVectorizer::new(&m, DEFAULT_FALLBACK_WEIGHT).unwrap();
    let weights: BTreeMap<String, f64> =
        [("governo".to_string(), 0.0), ("scuola".to_string(), 0.0)].into();

    let out = v.vectorize(&tokens(&["governo", "scuola"]), &weights);
    assert!(is_zero_vector(&out));
}

// ============================================================
// Similarity
// ============================================================

#[test]
fn cosine_is_bounded_and_symmetric() {
    let a = [0.3, -1.2, 4.0];
    let b = [-2.0, 0.5, 1.0];
    let ab = cosine_similarity(&a, &b);
    assert!((-1.0..=1.0).contains(&ab));
    assert!((ab - cosine_similarity(&b, &a)).abs() < 1e-12);
    assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-9);
    assert_eq!(cosine_similarity(&a, &[0.0, 0.0, 0.0]), 0.0);
}

#[test]
fn mean_of_nothing_is_none() {
    assert_eq!(mean_vector(&[]), None);
}

// ============================================================
// Summary
// ============================================================

#[test]
fn summary_drops_zero_vectors_and_keeps_indices() {
    let vectors = EntityMap::from_entries(vec![
        (
            Entity::from("renzi"),
            vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0]],
        ),
        (Entity::from("salvini"), vec![vec![0.0, 0.0]]),
        (Entity::from("meloni"), vec![vec![0.0, 2.0]]),
    ]);
    let summary = summarize_vectors(&vectors);

    assert_eq!(summary.zero_vectors_dropped, 2);
    let indices: Vec<(&str, usize)> = summary
        .points
        .iter()
        .map(|p| (p.entity.as_str(), p.text_index))
        .collect();
    assert_eq!(indices, vec![("renzi", 1), ("renzi", 2), ("meloni", 0)]);

    summary
        .centroids
        .assert_aligned_with(vectors.entities());
    assert_eq!(
        summary.centroids.get(&Entity::from("renzi")).unwrap(),
        &Some(vec![1.0, 0.5])
    );
    assert_eq!(summary.centroids.get(&Entity::from("salvini")).unwrap(), &None);

    // Only renzi and meloni have centroids
    assert_eq!(summary.similarities.len(), 1);
    let pair = &summary.similarities[0];
    assert_eq!((pair.a.as_str(), pair.b.as_str()), ("renzi", "meloni"));
    assert!((-1.0..=1.0).contains(&pair.cosine));
}
