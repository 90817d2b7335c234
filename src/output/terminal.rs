// Colored terminal output for analysis reports.
//
// Each section of an AnalysisReport has its own display function; main.rs
// calls the ones matching the requested outputs.

use colored::Colorize;

use super::truncate_chars;
use crate::corpus::EntityMap;
use crate::pipeline::{AnalysisReport, SentimentSection, VectorSection};
use crate::report::aggregate::SentimentShares;
use crate::report::descriptive::DescriptiveStats;
use crate::topics::keywords::Keyword;

/// Display everything the report contains.
pub fn display_report(report: &AnalysisReport, keyword_rows: usize) {
    if let Some(stats) = &report.stats {
        display_stats(stats);
    }
    if let Some(keywords) = &report.keywords {
        display_keywords(keywords, keyword_rows);
    }
    if let Some(sentiment) = &report.sentiment {
        display_sentiment(sentiment);
    }
    if let Some(vectors) = &report.vectors {
        display_vectors(vectors);
    }
}

pub fn display_stats(stats: &EntityMap<DescriptiveStats>) {
    println!("\n{}", "=== Descriptive Statistics ===".bold());
    println!();
    println!(
        "  {:<20} {:>6} {:>8} {:>6} {:>6} {:>6} {:>6} {:>8}",
        "Entity".dimmed(),
        "Texts".dimmed(),
        "AvgLen".dimmed(),
        "Max".dimmed(),
        "Min".dimmed(),
        "Links".dimmed(),
        "Tags".dimmed(),
        "Mentions".dimmed(),
    );
    println!("  {}", "-".repeat(74).dimmed());

    for (entity, s) in stats.iter() {
        let avg = s
            .average_length
            .map(|a| format!("{a:.1}"))
            .unwrap_or_else(|| "-".to_string());
        let max = s
            .longest_length
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let min = s
            .shortest_length
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<20} {:>6} {:>8} {:>6} {:>6} {:>6} {:>6} {:>8}",
            truncate_chars(entity.as_str(), 20),
            s.texts,
            avg,
            max,
            min,
            s.links,
            s.hashtags,
            s.mentions,
        );
    }
}

/// Display the top `rows` keywords per entity.
pub fn display_keywords(keywords: &EntityMap<Vec<Keyword>>, rows: usize) {
    println!("\n{}", "=== Top Keywords (TF-IDF) ===".bold());

    for (entity, list) in keywords.iter() {
        println!();
        println!("  {}", entity.as_str().bold());
        if list.is_empty() {
            println!("      {}", "no keywords".dimmed());
            continue;
        }
        for (i, keyword) in list.iter().take(rows).enumerate() {
            println!(
                "  {:>4}. {:<24} {}",
                i + 1,
                keyword.term,
                format!("{:.3}", keyword.weight).dimmed()
            );
        }
    }
}

pub fn display_sentiment(sentiment: &SentimentSection) {
    println!("\n{}", "=== Sentiment (share of texts) ===".bold());
    println!();

    let bar_width: usize = 30;

    for (entity, shares) in sentiment.shares.iter() {
        match shares {
            SentimentShares::NoData => {
                println!(
                    "  {:<20} {}",
                    truncate_chars(entity.as_str(), 20).bold(),
                    "no data".dimmed()
                );
            }
            SentimentShares::Shares {
                texts,
                negative,
                neutral,
                positive,
            } => {
                // Stacked bar: negative | neutral | positive
                let neg = (negative * bar_width as f64).round() as usize;
                let pos = (positive * bar_width as f64).round() as usize;
                let neu = bar_width.saturating_sub(neg + pos);
                println!(
                    "  {:<20} [{}{}{}] -{:>5.1}% ={:>5.1}% +{:>5.1}%  ({} texts)",
                    truncate_chars(entity.as_str(), 20).bold(),
                    "-".repeat(neg).bright_red(),
                    "=".repeat(neu).dimmed(),
                    "+".repeat(pos).bright_green(),
                    negative * 100.0,
                    neutral * 100.0,
                    positive * 100.0,
                    texts,
                );
            }
        }
    }
}

pub fn display_vectors(vectors: &VectorSection) {
    let summary = &vectors.summary;
    println!("\n{}", "=== Document Vectors ===".bold());
    println!();
    println!(
        "  {} vectors of width {} ready for projection ({} zero vectors dropped)",
        summary.points.len(),
        vectors.dimension,
        summary.zero_vectors_dropped
    );

    if summary.similarities.is_empty() {
        return;
    }

    println!();
    println!("  {}", "Centroid similarity".dimmed());
    for sim in &summary.similarities {
        let value = format!("{:>6.3}", sim.cosine);
        let colored_value = if sim.cosine >= 0.75 {
            value.bright_green()
        } else if sim.cosine >= 0.5 {
            value.bright_yellow()
        } else {
            value.normal()
        };
        println!(
            "  {:<20} {:<20} {}",
            truncate_chars(sim.a.as_str(), 20),
            truncate_chars(sim.b.as_str(), 20),
            colored_value
        );
    }
}
