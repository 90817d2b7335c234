// Keyword ranking: top TF-IDF terms per entity.

use std::collections::HashSet;

use anyhow::Result;
use serde::Serialize;

use super::tfidf::TermWeightTable;
use crate::corpus::EntityMap;

/// One ranked keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub term: String,
    pub weight: f64,
}

/// Filtering and cut-off for keyword ranking.
#[derive(Debug, Clone)]
pub struct KeywordParams {
    /// Terms with fewer characters than this are skipped.
    pub min_length: usize,
    /// Terms never reported as keywords (URL fragments and the like).
    pub excluded_terms: HashSet<String>,
    /// Maximum keywords per entity.
    pub top_n: usize,
}

impl Default for KeywordParams {
    fn default() -> Self {
        Self {
            min_length: 4,
            excluded_terms: ["https".to_string()].into_iter().collect(),
            top_n: 25,
        }
    }
}

impl KeywordParams {
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            anyhow::bail!("Keyword count (top_n) must be at least 1");
        }
        Ok(())
    }
}

/// Rank each entity's vocabulary by weight, highest first.
///
/// The sort is stable, so equal weights keep vocabulary order. Entities with
/// fewer qualifying terms than `top_n` get all of them; an entity with none
/// gets an empty list.
pub fn rank_keywords(table: &TermWeightTable, params: &KeywordParams) -> EntityMap<Vec<Keyword>> {
    table.by_entity().map(|_, row| {
        let mut candidates: Vec<Keyword> = row
            .iter()
            .filter(|(term, _)| term.chars().count() >= params.min_length)
            .filter(|(term, _)| !params.excluded_terms.contains(term.as_str()))
            .map(|(term, &weight)| Keyword {
                term: term.clone(),
                weight,
            })
            .collect();

        candidates.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        candidates.truncate(params.top_n);
        candidates
    })
}
