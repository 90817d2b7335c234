// Corpus sources: where the raw texts come from.
//
// Retrieval itself is someone else's job (scraping, the document store).
// A CorpusSource only has to hand back an ordered list of texts per entity;
// `build_corpus` turns that into the immutable Corpus the pipeline reads.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex_lite::Regex;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::models::{Corpus, Entity};

static RETWEET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(RT|rt)( @\w*)?[: ]").expect("valid retweet regex"));

/// Trait for anything that can supply raw texts grouped by entity.
pub trait CorpusSource {
    /// The entities this source knows about, in its natural order.
    fn entities(&self) -> Vec<Entity>;

    /// The ordered texts for one entity, or `None` if the source has no
    /// record of it.
    fn texts_for(&self, entity: &Entity) -> Result<Option<Vec<String>>>;
}

/// True for manual or native retweets ("RT @someone: ...").
pub fn is_retweet(text: &str) -> bool {
    RETWEET_REGEX.is_match(text)
}

/// Materialize a corpus from a source.
///
/// `entities` fixes the set and order of tracked entities; when `None`, the
/// source's own order is used. A requested entity the source doesn't know
/// gets zero texts rather than failing the run.
pub fn build_corpus(
    source: &dyn CorpusSource,
    entities: Option<&[Entity]>,
    skip_retweets: bool,
) -> Result<Corpus> {
    let entities = match entities {
        Some(list) => list.to_vec(),
        None => source.entities(),
    };

    let mut entries = Vec::with_capacity(entities.len());
    for entity in entities {
        let texts = match source.texts_for(&entity)? {
            Some(texts) => texts,
            None => {
                warn!(entity = %entity, "Entity not found in corpus source, using zero texts");
                Vec::new()
            }
        };

        let before = texts.len();
        let texts: Vec<String> = if skip_retweets {
            texts.into_iter().filter(|t| !is_retweet(t)).collect()
        } else {
            texts
        };
        debug!(
            entity = %entity,
            texts = texts.len(),
            retweets_dropped = before - texts.len(),
            "Loaded entity texts"
        );

        entries.push((entity, texts));
    }

    let corpus = Corpus::new(entries)?;
    info!(
        entities = corpus.entity_count(),
        texts = corpus.text_count(),
        "Built corpus"
    );
    Ok(corpus)
}

/// A stored text: either a bare string or a document-store row with a
/// `text` field.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredText {
    Plain(String),
    Row { text: String },
}

impl StoredText {
    fn into_text(self) -> String {
        match self {
            StoredText::Plain(text) | StoredText::Row { text } => text,
        }
    }
}

/// One entity's stored texts: a plain array, or a document-store table of
/// `id -> row` (TinyDB layout) read back in numeric id order.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredTable {
    Rows(Vec<StoredText>),
    Documents(HashMap<String, StoredText>),
}

/// TinyDB always writes this table, usually empty.
const DEFAULT_TABLE: &str = "_default";

impl StoredTable {
    fn is_empty(&self) -> bool {
        match self {
            StoredTable::Rows(rows) => rows.is_empty(),
            StoredTable::Documents(documents) => documents.is_empty(),
        }
    }

    fn into_texts(self) -> Result<Vec<String>> {
        let rows = match self {
            StoredTable::Rows(rows) => rows,
            StoredTable::Documents(documents) => {
                let mut keyed = documents
                    .into_iter()
                    .map(|(id, row)| {
                        let id: u64 = id
                            .parse()
                            .with_context(|| format!("Document id '{}' is not numeric", id))?;
                        Ok((id, row))
                    })
                    .collect::<Result<Vec<(u64, StoredText)>>>()?;
                keyed.sort_by_key(|(id, _)| *id);
                keyed.into_iter().map(|(_, row)| row).collect()
            }
        };
        Ok(rows.into_iter().map(StoredText::into_text).collect())
    }
}

/// Corpus source backed by a JSON object of `entity -> [texts]`, or a
/// TinyDB file of `entity -> {id: row}` tables.
///
/// Key order in the file is preserved and used as the default entity order.
#[derive(Debug, Clone)]
pub struct JsonCorpusSource {
    tables: Vec<(Entity, Vec<String>)>,
}

impl JsonCorpusSource {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus file {}", path.display()))?;
        Self::from_json_str(&raw)
            .with_context(|| format!("Failed to parse corpus file {}", path.display()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let object: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(raw).context("Corpus must be a JSON object of entity -> texts")?;

        let mut tables = Vec::with_capacity(object.len());
        for (name, value) in object {
            let table: StoredTable = serde_json::from_value(value).with_context(|| {
                format!(
                    "Texts for entity '{}' must be an array or an object of id -> row",
                    name
                )
            })?;
            if name == DEFAULT_TABLE && table.is_empty() {
                debug!("Skipping empty {} table", DEFAULT_TABLE);
                continue;
            }
            let texts = table
                .into_texts()
                .with_context(|| format!("Bad table for entity '{}'", name))?;
            tables.push((Entity::new(name), texts));
        }

        Ok(Self { tables })
    }
}

impl CorpusSource for JsonCorpusSource {
    fn entities(&self) -> Vec<Entity> {
        self.tables.iter().map(|(e, _)| e.clone()).collect()
    }

    fn texts_for(&self, entity: &Entity) -> Result<Option<Vec<String>>> {
        Ok(self
            .tables
            .iter()
            .find(|(e, _)| e == entity)
            .map(|(_, texts)| texts.clone()))
    }
}
