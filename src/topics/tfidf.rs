// TF-IDF over entity mega-documents.
//
// Each entity's mega-document is one "document", so document frequency ranges
// over 1..=|entities|. Weights are raw term count times ln(N / df). Terms that
// appear in more entities than the configured ceiling are dropped from the
// vocabulary entirely.
//
// The ceiling is an absolute entity count rather than a fraction: with a
// handful of entities, fractional thresholds round to "nothing" or
// "everything".

use std::collections::{BTreeMap, HashMap};

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::corpus::{Entity, EntityMap};
use crate::text::tokenizer::Tokenizer;

/// Parameters for the TF-IDF pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TfidfParams {
    /// Drop terms whose document frequency is greater than this many
    /// entities. `None` keeps every term.
    pub max_document_frequency: Option<usize>,
}

impl Default for TfidfParams {
    fn default() -> Self {
        // Six tracked entities: drop words used by four or more of them.
        Self {
            max_document_frequency: Some(3),
        }
    }
}

impl TfidfParams {
    /// Reject ceilings that exclude everything or nothing.
    pub fn validate(&self, entity_count: usize) -> Result<()> {
        if let Some(ceiling) = self.max_document_frequency {
            if ceiling == 0 {
                anyhow::bail!("Document-frequency ceiling must be at least 1 (got 0)");
            }
            if ceiling >= entity_count {
                anyhow::bail!(
                    "Document-frequency ceiling {} must be below the entity count {} \
                     (a ceiling that high never excludes a term; unset it instead)",
                    ceiling,
                    entity_count
                );
            }
        }
        Ok(())
    }
}

/// Sparse (entity, term) -> weight table.
///
/// A term with zero frequency for an entity has no entry. A present entry may
/// still be exactly 0.0 (a term used by every entity, when no ceiling is set);
/// callers that care use `get` and check for `None`.
#[derive(Debug, Clone, Serialize)]
pub struct TermWeightTable {
    weights: EntityMap<BTreeMap<String, f64>>,
    vocabulary_size: usize,
}

impl TermWeightTable {
    pub fn get(&self, entity: &Entity, term: &str) -> Option<f64> {
        self.weights.get(entity)?.get(term).copied()
    }

    /// All weighted terms for an entity, in vocabulary (lexicographic) order.
    pub fn weights_for(&self, entity: &Entity) -> Option<&BTreeMap<String, f64>> {
        self.weights.get(entity)
    }

    pub fn by_entity(&self) -> &EntityMap<BTreeMap<String, f64>> {
        &self.weights
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.weights.entities()
    }

    /// Number of distinct terms that survived the ceiling.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    /// Smallest strictly positive weight in the table.
    pub fn min_positive_weight(&self) -> Option<f64> {
        self.weights
            .values()
            .flat_map(|row| row.values().copied())
            .filter(|&w| w > 0.0)
            .min_by(|a, b| a.total_cmp(b))
    }
}

/// Computes a TermWeightTable from mega-documents.
pub struct TfidfEngine<'a> {
    pub params: TfidfParams,
    tokenizer: &'a Tokenizer,
}

impl<'a> TfidfEngine<'a> {
    pub fn new(params: TfidfParams, tokenizer: &'a Tokenizer) -> Self {
        Self { params, tokenizer }
    }

    /// Run the full pass. Every mega-document is scanned before any weight
    /// is emitted, since document frequency needs the whole collection.
    pub fn compute(&self, mega_documents: &EntityMap<String>) -> Result<TermWeightTable> {
        let entity_count = mega_documents.len();
        self.params.validate(entity_count)?;

        // Term counts per entity (parallel; each entity is independent).
        let term_counts: EntityMap<HashMap<String, usize>> =
            mega_documents.par_map(|_, doc| {
                let mut counts: HashMap<String, usize> = HashMap::new();
                for token in self.tokenizer.tokenize(doc) {
                    *counts.entry(token).or_insert(0) += 1;
                }
                counts
            });

        // Document frequency: in how many entities does each term appear?
        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        for counts in term_counts.values() {
            for term in counts.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let ceiling = self.params.max_document_frequency.unwrap_or(usize::MAX);
        let dropped = document_frequency
            .values()
            .filter(|&&df| df > ceiling)
            .count();
        let vocabulary_size = document_frequency.len() - dropped;

        let n = entity_count as f64;
        let weights = term_counts.map(|entity, counts| {
            let row: BTreeMap<String, f64> = counts
                .iter()
                .filter_map(|(term, &tf)| {
                    let df = document_frequency[term.as_str()];
                    if df > ceiling {
                        return None;
                    }
                    let idf = (n / df as f64).ln();
                    Some((term.clone(), tf as f64 * idf))
                })
                .collect();
            debug!(entity = %entity, terms = row.len(), "Weighted entity vocabulary");
            row
        });

        info!(
            entities = entity_count,
            vocabulary = vocabulary_size,
            dropped_by_ceiling = dropped,
            "Computed TF-IDF weights"
        );

        weights.assert_aligned_with(mega_documents.entities());

        Ok(TermWeightTable {
            weights,
            vocabulary_size,
        })
    }
}
