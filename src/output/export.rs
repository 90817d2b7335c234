// File exports: keyword table, full report, and projection input.
//
// keywords.csv is entity columns by ranked-keyword rows. report.json holds
// every requested section. projection.json holds only the non-zero document
// vectors, which is all an external 2-D projection step needs.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::corpus::EntityMap;
use crate::pipeline::AnalysisReport;
use crate::report::aggregate::ProjectionPoint;
use crate::topics::keywords::Keyword;

#[derive(Serialize)]
struct Stamped<'a, T: Serialize> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    body: &'a T,
}

#[derive(Serialize)]
struct ProjectionExport<'a> {
    generated_at: DateTime<Utc>,
    dimension: usize,
    points: &'a [ProjectionPoint],
}

/// Write the keyword table as CSV: one column per entity (corpus order),
/// one row per rank. Entities with fewer keywords get blank cells.
pub fn write_keyword_table<W: Write>(keywords: &EntityMap<Vec<Keyword>>, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(keywords.entities().map(|e| e.as_str()))
        .context("Failed to write keyword header")?;

    let rows = keywords.values().map(Vec::len).max().unwrap_or(0);
    for rank in 0..rows {
        let record = keywords
            .values()
            .map(|list| list.get(rank).map(|k| k.term.as_str()).unwrap_or(""));
        csv_writer
            .write_record(record)
            .with_context(|| format!("Failed to write keyword row {}", rank + 1))?;
    }

    csv_writer.flush().context("Failed to flush keyword table")?;
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// Write every export the report has data for into `out_dir`.
///
/// Returns the paths written.
pub fn write_all(report: &AnalysisReport, out_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let now = Utc::now();
    let mut written = Vec::new();

    let report_path = out_dir.join("report.json");
    write_json(
        &report_path,
        &Stamped {
            generated_at: now,
            body: report,
        },
    )?;
    written.push(report_path);

    if let Some(keywords) = &report.keywords {
        let path = out_dir.join("keywords.csv");
        let file =
            File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
        write_keyword_table(keywords, BufWriter::new(file))?;
        written.push(path);
    }

    if let Some(vectors) = &report.vectors {
        let path = out_dir.join("projection.json");
        write_json(
            &path,
            &ProjectionExport {
                generated_at: now,
                dimension: vectors.dimension,
                points: &vectors.summary.points,
            },
        )?;
        written.push(path);
    }

    info!(files = written.len(), dir = %out_dir.display(), "Wrote exports");
    Ok(written)
}
