// Composition tests: verifying that the stages chain together correctly.
//
// These tests exercise the data flow between modules:
//   Corpus -> Normalize -> Mega-documents -> TF-IDF -> Keywords / Vectors
//   Corpus -> Normalize -> Sentiment -> Shares
// with in-memory resources and no filesystem side effects (except the export
// test, which writes under the system temp directory).

use std::collections::HashSet;

use ember::corpus::source::{build_corpus, JsonCorpusSource};
use ember::corpus::{Corpus, Entity};
use ember::embeddings::word_vectors::WordVectors;
use ember::output::export;
use ember::pipeline::{Outputs, Pipeline, PipelineSettings};
use ember::report::aggregate::SentimentShares;
use ember::sentiment::lexicon::TsvLexicon;
use ember::text::tokenizer::Tokenizer;
use ember::topics::tfidf::TfidfParams;

const CORPUS_JSON: &str = r#"{
    "renzi": [
        "Le riforme servono all'Italia #riforme",
        "RT @pd: avanti con le riforme",
        "Un'ottima giornata a Bruxelles per l'Europa https://t.co/xyz",
        "Europa e riforme: bello lavorare insieme"
    ],
    "salvini": [
        "Confini sicuri, prima gli italiani!",
        "@matteorenzi vergogna, i confini vanno difesi",
        "Sicurezza e confini",
        "!!!"
    ],
    "meloni": [
        "Famiglia, patria e lavoro",
        {"text": "Una vergogna per la famiglia italiana"}
    ],
    "grasso": []
}"#;

fn corpus(skip_retweets: bool) -> Corpus {
    let source = JsonCorpusSource::from_json_str(CORPUS_JSON).unwrap();
    build_corpus(&source, None, skip_retweets).unwrap()
}

fn stop_words() -> Tokenizer {
    let stops: HashSet<String> = ["le", "e", "la", "per", "a", "i", "l", "gli", "con", "un", "una"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    Tokenizer::new(stops)
}

fn word_vectors() -> WordVectors {
    WordVectors::from_pairs(
        3,
        vec![
            ("riforme".to_string(), vec![1.0, 0.0, 0.0]),
            ("europa".to_string(), vec![0.8, 0.2, 0.0]),
            ("confini".to_string(), vec![0.0, 1.0, 0.0]),
            ("sicurezza".to_string(), vec![0.0, 0.9, 0.1]),
            ("famiglia".to_string(), vec![0.0, 0.0, 1.0]),
            ("lavoro".to_string(), vec![0.3, 0.3, 0.3]),
        ],
    )
    .unwrap()
}

fn lexicon() -> TsvLexicon {
    TsvLexicon::from_pairs(vec![
        ("ottima".to_string(), 1),
        ("bello".to_string(), 1),
        ("sicuri".to_string(), 1),
        ("vergogna".to_string(), -1),
    ])
    .unwrap()
}

fn settings(ceiling: Option<usize>) -> PipelineSettings {
    PipelineSettings {
        tfidf: TfidfParams {
            max_document_frequency: ceiling,
        },
        ..PipelineSettings::default()
    }
}

// ============================================================
// Chain: Corpus -> full report
// ============================================================

#[test]
fn full_run_keeps_entity_order_and_text_alignment() {
    let corpus = corpus(true);
    let tokenizer = stop_words();
    let model = word_vectors();
    let lex = lexicon();

    let report = Pipeline::new(settings(Some(2)), &tokenizer)
        .with_embeddings(&model)
        .with_lexicon(&lex)
        .run(&corpus, &Outputs::all())
        .unwrap();

    let order: Vec<&str> = report.entities.iter().map(Entity::as_str).collect();
    assert_eq!(order, vec!["renzi", "salvini", "meloni", "grasso"]);

    let keywords = report.keywords.as_ref().unwrap();
    let sentiment = report.sentiment.as_ref().unwrap();
    let vectors = report.vectors.as_ref().unwrap();
    let stats = report.stats.as_ref().unwrap();

    for entity in corpus.entities() {
        let text_count = corpus.texts(entity).unwrap().len();
        assert!(keywords.get(entity).is_some());
        assert_eq!(sentiment.scores.get(entity).unwrap().len(), text_count);
        assert_eq!(vectors.document_vectors.get(entity).unwrap().len(), text_count);
        assert_eq!(stats.get(entity).unwrap().texts, text_count);
        for vector in vectors.document_vectors.get(entity).unwrap() {
            assert_eq!(vector.len(), 3);
        }
    }

    // The retweet was filtered before anything else saw the corpus
    assert_eq!(corpus.texts(&Entity::from("renzi")).unwrap().len(), 3);
}

#[test]
fn full_run_surfaces_distinctive_keywords() {
    let corpus = corpus(true);
    let tokenizer = stop_words();

    let report = Pipeline::new(settings(Some(2)), &tokenizer)
        .run(
            &corpus,
            &Outputs {
                keywords: true,
                ..Outputs::default()
            },
        )
        .unwrap();
    let keywords = report.keywords.unwrap();

    let renzi: Vec<&str> = keywords
        .get(&Entity::from("renzi"))
        .unwrap()
        .iter()
        .map(|k| k.term.as_str())
        .collect();
    assert_eq!(renzi.first(), Some(&"riforme"));
    assert!(renzi.contains(&"europa"));

    let salvini = keywords.get(&Entity::from("salvini")).unwrap();
    assert_eq!(salvini[0].term, "confini");
    assert!(keywords.get(&Entity::from("grasso")).unwrap().is_empty());

    // Sections that weren't requested stay empty
    assert!(report.sentiment.is_none());
    assert!(report.vectors.is_none());
    assert!(report.stats.is_none());
}

#[test]
fn noise_only_text_yields_zero_vector_and_neutral_score() {
    let corpus = corpus(true);
    let tokenizer = stop_words();
    let model = word_vectors();
    let lex = lexicon();

    let report = Pipeline::new(settings(None), &tokenizer)
        .with_embeddings(&model)
        .with_lexicon(&lex)
        .run(
            &corpus,
            &Outputs {
                vectors: true,
                sentiment: true,
                ..Outputs::default()
            },
        )
        .unwrap();

    let salvini = Entity::from("salvini");
    let vectors = report.vectors.unwrap();
    let last = &vectors.document_vectors.get(&salvini).unwrap()[3];
    assert!(last.iter().all(|&v| v == 0.0));
    assert!(vectors
        .summary
        .points
        .iter()
        .all(|p| !(p.entity == salvini && p.text_index == 3)));

    let sentiment = report.sentiment.unwrap();
    assert_eq!(sentiment.scores.get(&salvini).unwrap()[3], 0.0);
    assert_eq!(
        sentiment.shares.get(&Entity::from("grasso")).unwrap(),
        &SentimentShares::NoData
    );
    let meloni = sentiment.scores.get(&Entity::from("meloni")).unwrap();
    assert_eq!(meloni, &vec![0.0, -1.0]);
}

// ============================================================
// Chain: validation happens before any work
// ============================================================

#[test]
fn vectors_without_model_fail_validation() {
    let corpus = corpus(true);
    let tokenizer = stop_words();
    let pipeline = Pipeline::new(settings(Some(2)), &tokenizer);

    let outputs = Outputs {
        vectors: true,
        ..Outputs::default()
    };
    assert!(pipeline.validate(&corpus, &outputs).is_err());
    assert!(pipeline.run(&corpus, &outputs).is_err());
}

#[test]
fn degenerate_ceiling_fails_validation() {
    let corpus = corpus(true);
    let tokenizer = stop_words();

    // Four entities: a ceiling of 4 excludes nothing
    let pipeline = Pipeline::new(settings(Some(4)), &tokenizer);
    let outputs = Outputs {
        keywords: true,
        ..Outputs::default()
    };
    assert!(pipeline.run(&corpus, &outputs).is_err());

    // Stats alone never touch TF-IDF
    let stats_only = Outputs {
        stats: true,
        ..Outputs::default()
    };
    assert!(pipeline.run(&corpus, &stats_only).is_ok());
}

#[test]
fn zero_top_n_fails_validation() {
    let corpus = corpus(true);
    let tokenizer = stop_words();
    let mut settings = settings(Some(2));
    settings.keywords.top_n = 0;

    let outputs = Outputs {
        keywords: true,
        ..Outputs::default()
    };
    assert!(Pipeline::new(settings, &tokenizer)
        .run(&corpus, &outputs)
        .is_err());
}

#[test]
fn settings_checked_without_loaded_resources() {
    let corpus = corpus(true);
    let everything = Outputs::all();

    // No model or lexicon exists yet: only the numeric knobs are checked
    assert!(settings(Some(2))
        .validate(corpus.entity_count(), &everything)
        .is_ok());
    assert!(settings(Some(4))
        .validate(corpus.entity_count(), &everything)
        .is_err());

    let mut zero_top_n = settings(Some(2));
    zero_top_n.keywords.top_n = 0;
    assert!(zero_top_n
        .validate(corpus.entity_count(), &everything)
        .is_err());

    let mut bad_fallback = settings(Some(2));
    bad_fallback.fallback_weight = 0.0;
    assert!(bad_fallback
        .validate(corpus.entity_count(), &everything)
        .is_err());

    // Sentiment alone ignores the TF-IDF ceiling
    let sentiment_only = Outputs {
        sentiment: true,
        ..Outputs::default()
    };
    assert!(settings(Some(4))
        .validate(corpus.entity_count(), &sentiment_only)
        .is_ok());
}

// ============================================================
// Chain: report -> export files
// ============================================================

#[test]
fn exports_written_for_requested_sections() {
    let corpus = corpus(false);
    let tokenizer = stop_words();
    let model = word_vectors();
    let lex = lexicon();

    let report = Pipeline::new(settings(Some(2)), &tokenizer)
        .with_embeddings(&model)
        .with_lexicon(&lex)
        .run(&corpus, &Outputs::all())
        .unwrap();

    let out_dir = std::env::temp_dir().join(format!("ember_export_{}", std::process::id()));
    let written = export::write_all(&report, &out_dir).unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["report.json", "keywords.csv", "projection.json"]);

    let table = std::fs::read_to_string(out_dir.join("keywords.csv")).unwrap();
    assert!(table.starts_with("renzi,salvini,meloni,grasso\n"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out_dir.join("report.json")).unwrap())
            .unwrap();
    assert!(json.get("generated_at").is_some());
    let keys: Vec<&String> = json["keywords"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["renzi", "salvini", "meloni", "grasso"]);

    let _ = std::fs::remove_dir_all(&out_dir);
}
