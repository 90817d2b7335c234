// Core data model: entities, the immutable corpus, and entity-keyed maps.
//
// The corpus is built once from a CorpusSource and only read afterwards.
// Every derived per-entity structure is an EntityMap, which enumerates the
// corpus's entities in corpus order and nothing else.

use std::fmt;

use anyhow::Result;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A tracked author whose texts are analyzed as one group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(String);

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Entity {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// An ordered map keyed by entity.
///
/// Insertion order is the iteration order. Lookups are linear, which is fine
/// because the entity set is small (a handful of tracked authors).
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMap<T> {
    entries: Vec<(Entity, T)>,
}

impl<T> EntityMap<T> {
    /// Build from ordered pairs. Panics on a duplicate entity, which can only
    /// come from a pipeline bug (the corpus itself rejects duplicates).
    pub fn from_entries(entries: Vec<(Entity, T)>) -> Self {
        for (i, (entity, _)) in entries.iter().enumerate() {
            assert!(
                !entries[..i].iter().any(|(e, _)| e == entity),
                "duplicate entity {entity} in entity map"
            );
        }
        Self { entries }
    }

    pub fn get(&self, entity: &Entity) -> Option<&T> {
        self.entries
            .iter()
            .find(|(e, _)| e == entity)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Entity, &T)> {
        self.entries.iter().map(|(e, v)| (e, v))
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entries.iter().map(|(e, _)| e)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Transform every value, keeping the entity order.
    pub fn map<U>(&self, mut f: impl FnMut(&Entity, &T) -> U) -> EntityMap<U> {
        EntityMap {
            entries: self.entries.iter().map(|(e, v)| (e.clone(), f(e, v))).collect(),
        }
    }

    /// Assert that this map enumerates exactly the given entities, in order.
    ///
    /// A mismatch means a stage dropped or reordered entities: a programming
    /// error, not bad data.
    pub fn assert_aligned_with<'a>(&self, expected: impl IntoIterator<Item = &'a Entity>) {
        let expected: Vec<&Entity> = expected.into_iter().collect();
        let actual: Vec<&Entity> = self.entities().collect();
        assert_eq!(
            actual, expected,
            "entity-keyed output is not aligned with the corpus"
        );
    }
}

impl<T: Send + Sync> EntityMap<T> {
    /// Parallel counterpart of `map`. Output order matches input order.
    pub fn par_map<U: Send>(&self, f: impl Fn(&Entity, &T) -> U + Sync + Send) -> EntityMap<U> {
        use rayon::prelude::*;

        EntityMap {
            entries: self
                .entries
                .par_iter()
                .map(|(e, v)| (e.clone(), f(e, v)))
                .collect(),
        }
    }
}

// Serialized as a JSON object whose key order is the entity order.
impl<T: Serialize> Serialize for EntityMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (entity, value) in &self.entries {
            map.serialize_entry(entity.as_str(), value)?;
        }
        map.end()
    }
}

/// The immutable input: every tracked entity with its ordered raw texts.
#[derive(Debug, Clone, PartialEq)]
pub struct Corpus {
    texts: EntityMap<Vec<String>>,
}

impl Corpus {
    /// Build a corpus from ordered (entity, texts) pairs.
    ///
    /// Returns an error if the same entity appears twice.
    pub fn new(entries: Vec<(Entity, Vec<String>)>) -> Result<Self> {
        for (i, (entity, _)) in entries.iter().enumerate() {
            if entries[..i].iter().any(|(e, _)| e == entity) {
                anyhow::bail!("Entity '{}' appears more than once in the corpus", entity);
            }
        }
        Ok(Self {
            texts: EntityMap::from_entries(entries),
        })
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.texts.entities()
    }

    pub fn entity_count(&self) -> usize {
        self.texts.len()
    }

    pub fn texts(&self, entity: &Entity) -> Option<&[String]> {
        self.texts.get(entity).map(Vec::as_slice)
    }

    /// The raw texts keyed by entity, in corpus order.
    pub fn by_entity(&self) -> &EntityMap<Vec<String>> {
        &self.texts
    }

    /// Total number of raw texts across all entities.
    pub fn text_count(&self) -> usize {
        self.texts.values().map(Vec::len).sum()
    }
}
