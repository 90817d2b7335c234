// Word vectors loaded from the word2vec text format.
//
// Format: an optional "<count> <dim>" header line, then one line per token:
// "<token> <v1> <v2> ... <vd>". The first data row fixes the dimension when
// there's no header; any row of a different width fails the load.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::traits::EmbeddingModel;

/// In-memory word vectors.
#[derive(Debug, Clone)]
pub struct WordVectors {
    dimension: usize,
    vectors: HashMap<String, Vec<f64>>,
}

impl WordVectors {
    /// Build from explicit (token, vector) pairs. Every vector must be
    /// `dimension` wide.
    pub fn from_pairs(
        dimension: usize,
        pairs: impl IntoIterator<Item = (String, Vec<f64>)>,
    ) -> Result<Self> {
        let mut vectors = HashMap::new();
        for (token, vector) in pairs {
            if vector.len() != dimension {
                anyhow::bail!(
                    "Vector for '{}' has width {}, expected {}",
                    token,
                    vector.len(),
                    dimension
                );
            }
            vectors.insert(token, vector);
        }
        Ok(Self { dimension, vectors })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open word vectors {}", path.display()))?;
        let model = Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse word vectors {}", path.display()))?;
        info!(
            tokens = model.len(),
            dimension = model.dimension,
            path = %path.display(),
            "Loaded word vectors"
        );
        Ok(model)
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut dimension: Option<usize> = None;
        let mut vectors = HashMap::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.context("Failed to read word vector line")?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }

            // "<count> <dim>" header on the first line
            if line_no == 0 && fields.len() == 2 {
                if let (Ok(_), Ok(dim)) = (fields[0].parse::<usize>(), fields[1].parse::<usize>())
                {
                    dimension = Some(dim);
                    continue;
                }
            }

            let token = fields[0];
            let values = fields[1..]
                .iter()
                .map(|v| v.parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
                .with_context(|| format!("Bad number on line {} (token '{}')", line_no + 1, token))?;

            let expected = *dimension.get_or_insert(values.len());
            if values.len() != expected || expected == 0 {
                anyhow::bail!(
                    "Line {} (token '{}') has {} values, expected {}",
                    line_no + 1,
                    token,
                    values.len(),
                    expected
                );
            }

            vectors.insert(token.to_string(), values);
        }

        let dimension = dimension.context("Word vector file is empty")?;
        Ok(Self { dimension, vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl EmbeddingModel for WordVectors {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn vector(&self, token: &str) -> Option<&[f64]> {
        self.vectors.get(token).map(Vec::as_slice)
    }
}
