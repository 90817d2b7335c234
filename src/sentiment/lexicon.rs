// Polarity lexicon loaded from a tab-separated file.
//
// One "token<TAB>polarity" pair per line. Blank lines and lines starting with
// '#' are ignored. Tokens are lowercased on load. Polarities must be -1, 0 or
// +1 so that a mean of them stays in [-1, 1].

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::traits::PolarityLexicon;

/// In-memory polarity lexicon.
#[derive(Debug, Clone, Default)]
pub struct TsvLexicon {
    entries: HashMap<String, i8>,
}

impl TsvLexicon {
    /// Build from explicit (token, polarity) pairs. Fails on a polarity
    /// outside -1..=1.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, i8)>) -> Result<Self> {
        let mut entries = HashMap::new();
        for (token, polarity) in pairs {
            check_polarity(polarity).with_context(|| format!("Bad entry for '{}'", token))?;
            entries.insert(token.to_lowercase(), polarity);
        }
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open polarity lexicon {}", path.display()))?;
        let lexicon = Self::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse polarity lexicon {}", path.display()))?;
        info!(
            tokens = lexicon.len(),
            path = %path.display(),
            "Loaded polarity lexicon"
        );
        Ok(lexicon)
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut entries = HashMap::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line.context("Failed to read lexicon line")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (token, polarity) = line
                .split_once('\t')
                .with_context(|| format!("Line {} is not 'token<TAB>polarity'", line_no + 1))?;
            let polarity: i8 = polarity
                .trim()
                .parse()
                .with_context(|| format!("Bad polarity on line {}: '{}'", line_no + 1, polarity))?;
            check_polarity(polarity)
                .with_context(|| format!("Bad polarity on line {}", line_no + 1))?;

            entries.insert(token.trim().to_lowercase(), polarity);
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_polarity(polarity: i8) -> Result<()> {
    if !(-1..=1).contains(&polarity) {
        anyhow::bail!("Polarity must be -1, 0 or 1 (got {})", polarity);
    }
    Ok(())
}

impl PolarityLexicon for TsvLexicon {
    fn polarity(&self, token: &str) -> Option<i8> {
        self.entries.get(token).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader() {
        let data = "# italian polarity\nbuono\t1\n\nPessimo\t-1\nforse\t0\n";
        let lex = TsvLexicon::from_reader(data.as_bytes()).unwrap();
        assert_eq!(lex.len(), 3);
        assert_eq!(lex.polarity("pessimo"), Some(-1));
        assert_eq!(lex.polarity("forse"), Some(0));
        assert_eq!(lex.polarity("pippo"), None);
    }

    #[test]
    fn test_reader_rejects_malformed_lines() {
        assert!(TsvLexicon::from_reader("buono 1\n".as_bytes()).is_err());
        assert!(TsvLexicon::from_reader("buono\tmolto\n".as_bytes()).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_polarity() {
        assert!(TsvLexicon::from_reader("ottimo\t3\n".as_bytes()).is_err());
        assert!(TsvLexicon::from_reader("pessimo\t-2\n".as_bytes()).is_err());
        assert!(TsvLexicon::from_pairs(vec![("ottimo".to_string(), 3)]).is_err());
        assert!(TsvLexicon::from_pairs(vec![("bene".to_string(), 1)]).is_ok());
    }
}
