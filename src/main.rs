use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use ember::config::{self, Config};
use ember::corpus::source::{build_corpus, JsonCorpusSource};
use ember::corpus::Entity;
use ember::embeddings::word_vectors::WordVectors;
use ember::output::{export, terminal};
use ember::pipeline::{Outputs, Pipeline};
use ember::sentiment::lexicon::TsvLexicon;
use ember::text::stopwords::{BuiltinStopWords, StopWordSource};
use ember::text::tokenizer::Tokenizer;

/// Ember: lexical and semantic signals for social-media authors.
///
/// Ranks each author's distinctive keywords, scores post sentiment, and
/// builds TF-IDF-weighted document vectors ready for projection.
#[derive(Parser)]
#[command(name = "ember", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Corpus file (JSON object of entity -> texts)
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    /// Ordered, comma-separated entity list (default: corpus file order)
    #[arg(long, global = true, value_delimiter = ',')]
    entities: Option<Vec<String>>,

    /// Drop terms used by more than this many entities ("none" to disable)
    #[arg(long, global = true)]
    max_df: Option<String>,

    /// Keywords to keep per entity
    #[arg(long, global = true)]
    top_n: Option<usize>,

    /// Stop-word language (it, en, fr, de, es, pt, nl)
    #[arg(long, global = true)]
    language: Option<String>,

    /// Directory for exported files
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    /// Print results without writing export files
    #[arg(long, global = true)]
    no_export: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-entity descriptive statistics (counts, lengths, links, hashtags)
    Stats,

    /// Top TF-IDF keywords per entity
    Keywords {
        /// Keyword rows to print per entity (all are exported)
        #[arg(long, default_value = "10")]
        show: usize,
    },

    /// Sentiment score per text and negative/neutral/positive shares per entity
    Sentiment,

    /// TF-IDF-weighted document vectors, filtered for projection
    Vectors,

    /// Run every stage
    Analyze {
        /// Keyword rows to print per entity (all are exported)
        #[arg(long, default_value = "10")]
        show: usize,
    },
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ember=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(corpus) = cli.corpus {
        config.corpus_path = corpus;
    }
    if let Some(entities) = cli.entities {
        config.entities = Some(entities.into_iter().map(Entity::new).collect());
    }
    if let Some(raw) = cli.max_df.as_deref() {
        config.max_document_frequency = config::parse_ceiling(raw)?;
    }
    if let Some(top_n) = cli.top_n {
        config.top_n = top_n;
    }
    if let Some(language) = cli.language {
        config.language = language;
    }
    if let Some(out) = cli.out {
        config.out_dir = out;
    }

    let (outputs, show) = match cli.command {
        Commands::Stats => (
            Outputs {
                stats: true,
                ..Outputs::default()
            },
            0,
        ),
        Commands::Keywords { show } => (
            Outputs {
                keywords: true,
                ..Outputs::default()
            },
            show,
        ),
        Commands::Sentiment => (
            Outputs {
                sentiment: true,
                ..Outputs::default()
            },
            0,
        ),
        Commands::Vectors => (
            Outputs {
                vectors: true,
                ..Outputs::default()
            },
            0,
        ),
        Commands::Analyze { show } => (Outputs::all(), show),
    };

    run(&config, &outputs, show, !cli.no_export)
}

fn run(config: &Config, outputs: &Outputs, keyword_rows: usize, write_exports: bool) -> Result<()> {
    config.require_corpus()?;
    let source = JsonCorpusSource::load(&config.corpus_path)?;
    let corpus = build_corpus(&source, config.entities.as_deref(), config.skip_retweets)?;

    println!(
        "Analyzing {} texts from {} entities...",
        corpus.text_count(),
        corpus.entity_count()
    );

    // Bad thresholds surface before any resource is read from disk.
    let settings = config.pipeline_settings();
    settings.validate(corpus.entity_count(), outputs)?;

    // Stop words only matter to the stages that tokenize for TF-IDF.
    let stop_words = if outputs.keywords || outputs.vectors {
        BuiltinStopWords.lookup(&config.language)?
    } else {
        HashSet::new()
    };
    info!(
        language = %config.language,
        stop_words = stop_words.len(),
        "Loaded stop words"
    );
    let tokenizer = Tokenizer::new(stop_words);

    let embeddings = if outputs.vectors {
        config.require_embeddings()?;
        Some(WordVectors::load(&config.embeddings_path)?)
    } else {
        None
    };
    let lexicon = if outputs.sentiment {
        config.require_lexicon()?;
        Some(TsvLexicon::load(&config.lexicon_path)?)
    } else {
        None
    };

    let mut pipeline = Pipeline::new(settings, &tokenizer).with_progress(true);
    if let Some(model) = &embeddings {
        pipeline = pipeline.with_embeddings(model);
    }
    if let Some(lexicon) = &lexicon {
        pipeline = pipeline.with_lexicon(lexicon);
    }

    let report = pipeline.run(&corpus, outputs)?;
    terminal::display_report(&report, keyword_rows);

    if write_exports {
        let written = export::write_all(&report, &config.out_dir)?;
        println!();
        for path in &written {
            println!("  {} {}", "wrote".dimmed(), path.display());
        }
    }

    Ok(())
}
