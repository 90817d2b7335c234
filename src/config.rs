use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::corpus::Entity;
use crate::embeddings::vectorizer::DEFAULT_FALLBACK_WEIGHT;
use crate::pipeline::PipelineSettings;
use crate::text::normalizer::NormalizeOptions;
use crate::topics::keywords::KeywordParams;
use crate::topics::tfidf::TfidfParams;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy. CLI flags override the
/// per-run knobs after loading.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file of entity -> texts
    pub corpus_path: PathBuf,
    /// Ordered entity list; `None` means "file order"
    pub entities: Option<Vec<Entity>>,
    /// Stop-word language code (it, en, fr, ...)
    pub language: String,
    pub max_document_frequency: Option<usize>,
    pub top_n: usize,
    pub min_keyword_length: usize,
    pub excluded_terms: HashSet<String>,
    pub strip_hashtags: bool,
    pub skip_retweets: bool,
    pub fallback_weight: f64,
    /// Word vectors in word2vec text format
    pub embeddings_path: PathBuf,
    /// Tab-separated polarity lexicon
    pub lexicon_path: PathBuf,
    pub out_dir: PathBuf,
}

/// Returns the default directory for resource files.
/// Uses the platform data directory: ~/.local/share/ember/resources/ on Linux.
pub fn default_resource_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ember")
        .join("resources")
}

/// Parse a comma-separated list, dropping empty items.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{} must be true or false (got '{}')", name, other),
    }
}

/// Parse a document-frequency ceiling: a positive integer, or "none".
pub fn parse_ceiling(raw: &str) -> Result<Option<usize>> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    let ceiling: usize = raw
        .parse()
        .with_context(|| format!("Document-frequency ceiling must be an integer or 'none' (got '{}')", raw))?;
    Ok(Some(ceiling))
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every value has a default; malformed values are an error.
    pub fn load() -> Result<Self> {
        let resource_dir = env::var("EMBER_RESOURCE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_resource_dir());

        let max_document_frequency = match env::var("EMBER_MAX_DF") {
            Ok(raw) => parse_ceiling(&raw)?,
            Err(_) => TfidfParams::default().max_document_frequency,
        };

        let keyword_defaults = KeywordParams::default();
        let top_n = match env::var("EMBER_TOP_N") {
            Ok(raw) => raw.trim().parse().context("EMBER_TOP_N must be an integer")?,
            Err(_) => keyword_defaults.top_n,
        };
        let min_keyword_length = match env::var("EMBER_MIN_KEYWORD_LEN") {
            Ok(raw) => raw
                .trim()
                .parse()
                .context("EMBER_MIN_KEYWORD_LEN must be an integer")?,
            Err(_) => keyword_defaults.min_length,
        };
        let excluded_terms = match env::var("EMBER_EXCLUDED_TERMS") {
            Ok(raw) => parse_list(&raw).into_iter().collect(),
            Err(_) => keyword_defaults.excluded_terms,
        };

        let strip_hashtags = match env::var("EMBER_STRIP_HASHTAGS") {
            Ok(raw) => parse_bool("EMBER_STRIP_HASHTAGS", &raw)?,
            Err(_) => NormalizeOptions::default().strip_hashtags,
        };
        let skip_retweets = match env::var("EMBER_SKIP_RETWEETS") {
            Ok(raw) => parse_bool("EMBER_SKIP_RETWEETS", &raw)?,
            Err(_) => true,
        };

        let fallback_weight = match env::var("EMBER_FALLBACK_WEIGHT") {
            Ok(raw) => raw
                .trim()
                .parse()
                .context("EMBER_FALLBACK_WEIGHT must be a number")?,
            Err(_) => DEFAULT_FALLBACK_WEIGHT,
        };

        Ok(Self {
            corpus_path: env::var("EMBER_CORPUS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./corpus.json")),
            entities: env::var("EMBER_ENTITIES")
                .ok()
                .map(|raw| parse_list(&raw).into_iter().map(Entity::new).collect())
                .filter(|list: &Vec<Entity>| !list.is_empty()),
            language: env::var("EMBER_LANGUAGE").unwrap_or_else(|_| "it".to_string()),
            max_document_frequency,
            top_n,
            min_keyword_length,
            excluded_terms,
            strip_hashtags,
            skip_retweets,
            fallback_weight,
            embeddings_path: env::var("EMBER_EMBEDDINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| resource_dir.join("word_vectors.txt")),
            lexicon_path: env::var("EMBER_LEXICON_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| resource_dir.join("polarity.tsv")),
            out_dir: env::var("EMBER_OUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./out")),
        })
    }

    /// Check that the corpus file exists.
    pub fn require_corpus(&self) -> Result<()> {
        if !self.corpus_path.exists() {
            anyhow::bail!(
                "Corpus file not found: {}\n\
                 Set EMBER_CORPUS_PATH or pass --corpus.",
                self.corpus_path.display()
            );
        }
        Ok(())
    }

    /// Check that the word vectors file exists.
    /// Call this before any operation that builds document vectors.
    pub fn require_embeddings(&self) -> Result<()> {
        if !self.embeddings_path.exists() {
            anyhow::bail!(
                "Word vectors not found: {}\n\
                 Set EMBER_EMBEDDINGS_PATH to a word2vec text-format file.",
                self.embeddings_path.display()
            );
        }
        Ok(())
    }

    /// Check that the polarity lexicon exists.
    /// Call this before any operation that scores sentiment.
    pub fn require_lexicon(&self) -> Result<()> {
        if !self.lexicon_path.exists() {
            anyhow::bail!(
                "Polarity lexicon not found: {}\n\
                 Set EMBER_LEXICON_PATH to a token<TAB>polarity file.",
                self.lexicon_path.display()
            );
        }
        Ok(())
    }

    /// Stage parameters derived from this configuration.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            normalize: NormalizeOptions {
                strip_hashtags: self.strip_hashtags,
                ..NormalizeOptions::default()
            },
            tfidf: TfidfParams {
                max_document_frequency: self.max_document_frequency,
            },
            keywords: KeywordParams {
                min_length: self.min_keyword_length,
                excluded_terms: self.excluded_terms.clone(),
                top_n: self.top_n,
            },
            fallback_weight: self.fallback_weight,
        }
    }
}
