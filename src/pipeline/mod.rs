// Analysis pipeline: runs the requested stages over one corpus.
//
// Stage order:
// 1. Normalize every raw text once (shared by all later stages)
// 2. Build mega-documents and the TF-IDF table (if keywords or vectors are
//    requested). This is a barrier: nothing downstream starts until every
//    entity has been counted.
// 3. Rank keywords
// 4. Build TF-IDF-weighted document vectors
// 5. Score sentiment
// 6. Summarize per entity
//
// Every stage is a pure function of the corpus and the loaded resources.
// Per-entity work runs on the rayon pool.

use std::collections::BTreeMap;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::corpus::{Corpus, Entity, EntityMap};
use crate::embeddings::traits::EmbeddingModel;
use crate::embeddings::vectorizer::{validate_fallback_weight, DocumentVectorizer};
use crate::report::aggregate::{self, SentimentShares, VectorSummary};
use crate::report::descriptive::{self, DescriptiveStats};
use crate::sentiment::scorer::LexiconScorer;
use crate::sentiment::traits::{PolarityLexicon, SentimentScorer};
use crate::text::normalizer::{normalize, NormalizeOptions};
use crate::text::tokenizer::Tokenizer;
use crate::topics::keywords::{self, Keyword, KeywordParams};
use crate::topics::megadoc::build_mega_documents;
use crate::topics::tfidf::{TermWeightTable, TfidfEngine, TfidfParams};

/// Which outputs a run should produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outputs {
    pub keywords: bool,
    pub vectors: bool,
    pub sentiment: bool,
    pub stats: bool,
}

impl Outputs {
    pub fn all() -> Self {
        Self {
            keywords: true,
            vectors: true,
            sentiment: true,
            stats: true,
        }
    }

    pub fn needs_tfidf(&self) -> bool {
        self.keywords || self.vectors
    }
}

/// Tunable parameters for every stage.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub normalize: NormalizeOptions,
    pub tfidf: TfidfParams,
    pub keywords: KeywordParams,
    pub fallback_weight: f64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            normalize: NormalizeOptions::default(),
            tfidf: TfidfParams::default(),
            keywords: KeywordParams::default(),
            fallback_weight: crate::embeddings::vectorizer::DEFAULT_FALLBACK_WEIGHT,
        }
    }
}

impl PipelineSettings {
    /// Check the numeric knobs a run with these outputs depends on. Needs
    /// only the entity count, so it can run before any resource is loaded.
    pub fn validate(&self, entity_count: usize, outputs: &Outputs) -> Result<()> {
        if outputs.needs_tfidf() {
            self.tfidf.validate(entity_count)?;
        }
        if outputs.keywords {
            self.keywords.validate()?;
        }
        if outputs.vectors {
            validate_fallback_weight(self.fallback_weight)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentSection {
    /// One score per raw text, aligned with the corpus.
    pub scores: EntityMap<Vec<f64>>,
    pub shares: EntityMap<SentimentShares>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VectorSection {
    pub dimension: usize,
    /// One vector per raw text, aligned with the corpus. Zero vectors
    /// included; `summary` has them filtered out.
    #[serde(skip)]
    pub document_vectors: EntityMap<Vec<Vec<f64>>>,
    pub summary: VectorSummary,
}

/// Everything a run produced. Sections that weren't requested are `None`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub entities: Vec<Entity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<EntityMap<DescriptiveStats>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<EntityMap<Vec<Keyword>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vectors: Option<VectorSection>,
}

/// The pipeline with its resources bound.
pub struct Pipeline<'a> {
    settings: PipelineSettings,
    tokenizer: &'a Tokenizer,
    embeddings: Option<&'a dyn EmbeddingModel>,
    lexicon: Option<&'a dyn PolarityLexicon>,
    show_progress: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(settings: PipelineSettings, tokenizer: &'a Tokenizer) -> Self {
        Self {
            settings,
            tokenizer,
            embeddings: None,
            lexicon: None,
            show_progress: false,
        }
    }

    pub fn with_embeddings(mut self, model: &'a dyn EmbeddingModel) -> Self {
        self.embeddings = Some(model);
        self
    }

    pub fn with_lexicon(mut self, lexicon: &'a dyn PolarityLexicon) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    /// Show a terminal progress bar during vectorization.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Check every configuration knob a run with these outputs depends on.
    /// Called before any computation starts.
    pub fn validate(&self, corpus: &Corpus, outputs: &Outputs) -> Result<()> {
        self.settings.validate(corpus.entity_count(), outputs)?;
        if outputs.vectors && self.embeddings.is_none() {
            anyhow::bail!("Document vectors requested but no embedding model is loaded");
        }
        if outputs.sentiment && self.lexicon.is_none() {
            anyhow::bail!("Sentiment requested but no polarity lexicon is loaded");
        }
        Ok(())
    }

    pub fn run(&self, corpus: &Corpus, outputs: &Outputs) -> Result<AnalysisReport> {
        self.validate(corpus, outputs)?;

        info!(
            entities = corpus.entity_count(),
            texts = corpus.text_count(),
            ?outputs,
            "Starting analysis"
        );

        let options = self.settings.normalize;
        let cleaned: EntityMap<Vec<String>> = corpus
            .by_entity()
            .par_map(|_, texts| texts.iter().map(|t| normalize(t, &options)).collect());

        let table = if outputs.needs_tfidf() {
            let mega_documents = build_mega_documents(&cleaned);
            Some(TfidfEngine::new(self.settings.tfidf, self.tokenizer).compute(&mega_documents)?)
        } else {
            None
        };

        let keywords = match (&table, outputs.keywords) {
            (Some(table), true) => Some(keywords::rank_keywords(table, &self.settings.keywords)),
            _ => None,
        };

        let vectors = match (&table, self.embeddings, outputs.vectors) {
            (Some(table), Some(model), true) => Some(self.vectorize(&cleaned, table, model)?),
            _ => None,
        };

        let sentiment = match (self.lexicon, outputs.sentiment) {
            (Some(lexicon), true) => Some(self.score_sentiment(&cleaned, lexicon)),
            _ => None,
        };

        let stats = outputs.stats.then(|| descriptive::describe_corpus(corpus));

        let report = AnalysisReport {
            entities: corpus.entities().cloned().collect(),
            stats,
            keywords,
            sentiment,
            vectors,
        };
        check_alignment(corpus, &report);

        info!("Analysis complete");
        Ok(report)
    }

    fn vectorize(
        &self,
        cleaned: &EntityMap<Vec<String>>,
        table: &TermWeightTable,
        model: &dyn EmbeddingModel,
    ) -> Result<VectorSection> {
        let vectorizer = DocumentVectorizer::new(model, self.settings.fallback_weight)?;

        if let Some(min_weight) = table.min_positive_weight() {
            if vectorizer.fallback_weight() >= min_weight {
                warn!(
                    fallback = vectorizer.fallback_weight(),
                    min_weight,
                    "Fallback weight is not below the smallest TF-IDF weight"
                );
            }
        }

        let pb = if self.show_progress {
            let pb = ProgressBar::new(cleaned.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar().template("  Vectors [{bar:30}] {pos}/{len} ({eta})")?,
            );
            pb
        } else {
            ProgressBar::hidden()
        };

        let document_vectors = cleaned.par_map(|entity, texts| {
            let weights: &BTreeMap<String, f64> = table
                .weights_for(entity)
                .expect("TF-IDF table covers every corpus entity");
            let vectors: Vec<Vec<f64>> = texts
                .par_iter()
                .map(|text| vectorizer.vectorize(&self.tokenizer.tokenize(text), weights))
                .collect();
            pb.inc(1);
            vectors
        });
        pb.finish_and_clear();

        let summary = aggregate::summarize_vectors(&document_vectors);
        info!(
            dimension = vectorizer.dimension(),
            projected = summary.points.len(),
            zero_vectors = summary.zero_vectors_dropped,
            "Built document vectors"
        );

        Ok(VectorSection {
            dimension: vectorizer.dimension(),
            document_vectors,
            summary,
        })
    }

    fn score_sentiment(
        &self,
        cleaned: &EntityMap<Vec<String>>,
        lexicon: &dyn PolarityLexicon,
    ) -> SentimentSection {
        let scorer = LexiconScorer::new(lexicon);
        let scores = cleaned.par_map(|_, texts| scorer.score_batch(texts));
        let shares = aggregate::sentiment_shares(&scores);
        info!("Scored sentiment");
        SentimentSection { scores, shares }
    }
}

/// Every entity-keyed section must list the corpus's entities in order, and
/// every per-text section must have one value per raw text.
fn check_alignment(corpus: &Corpus, report: &AnalysisReport) {
    let entities = || corpus.entities();

    if let Some(stats) = &report.stats {
        stats.assert_aligned_with(entities());
    }
    if let Some(keywords) = &report.keywords {
        keywords.assert_aligned_with(entities());
    }
    if let Some(sentiment) = &report.sentiment {
        sentiment.scores.assert_aligned_with(entities());
        sentiment.shares.assert_aligned_with(entities());
        for (entity, scores) in sentiment.scores.iter() {
            assert_eq!(
                scores.len(),
                corpus.texts(entity).map_or(0, <[String]>::len),
                "sentiment scores misaligned with texts of {entity}"
            );
        }
    }
    if let Some(vectors) = &report.vectors {
        vectors.document_vectors.assert_aligned_with(entities());
        vectors.summary.centroids.assert_aligned_with(entities());
        for (entity, entity_vectors) in vectors.document_vectors.iter() {
            assert_eq!(
                entity_vectors.len(),
                corpus.texts(entity).map_or(0, <[String]>::len),
                "document vectors misaligned with texts of {entity}"
            );
        }
    }
}
