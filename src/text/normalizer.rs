// Text normalization: strip social-media noise and restrict the charset.
//
// Noise tokens (mentions, links, optionally hashtags) are removed up to the
// next space. What's left is lowercased and every character outside
// [a-z0-9 ] becomes a space. Accented letters and non-Latin scripts are
// destroyed by this step; downstream stages only ever see ASCII words.

use std::sync::LazyLock;

use regex_lite::Regex;

static MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[^ ]+").expect("valid mention regex"));
static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:https?://|www)[^ ]*").expect("valid link regex"));
static HASHTAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#[^ ]+").expect("valid hashtag regex"));

/// A class of noise token found in posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseClass {
    Mention,
    Link,
    Hashtag,
}

impl NoiseClass {
    fn regex(self) -> &'static Regex {
        match self {
            NoiseClass::Mention => &MENTION_REGEX,
            NoiseClass::Link => &LINK_REGEX,
            NoiseClass::Hashtag => &HASHTAG_REGEX,
        }
    }

    /// Number of occurrences of this noise class in a raw text.
    pub fn count(self, text: &str) -> usize {
        self.regex().find_iter(text).count()
    }

    fn strip(self, text: &str) -> String {
        self.regex().replace_all(text, "").into_owned()
    }
}

/// Which noise classes to strip before charset restriction.
///
/// With `strip_hashtags` off, only the `#` goes away (it's not in the kept
/// charset) and the hashtag word itself survives as a regular token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub strip_mentions: bool,
    pub strip_links: bool,
    pub strip_hashtags: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            strip_mentions: true,
            strip_links: true,
            strip_hashtags: false,
        }
    }
}

/// Normalize one raw text into its cleaned form.
///
/// Never fails. Empty or whitespace-only results come back as `""`.
pub fn normalize(text: &str, options: &NormalizeOptions) -> String {
    let mut text = text.to_string();
    // Mentions before links: "@user/https://..." goes as a single token.
    if options.strip_mentions {
        text = NoiseClass::Mention.strip(&text);
    }
    if options.strip_links {
        text = NoiseClass::Link.strip(&text);
    }
    if options.strip_hashtags {
        text = NoiseClass::Hashtag.strip(&text);
    }

    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' ' {
                c
            } else {
                ' '
            }
        })
        .collect();

    if cleaned.trim().is_empty() {
        String::new()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_mentions_and_links() {
        let out = normalize(
            "Grazie @mario per https://t.co/abc il supporto www.example.it",
            &NormalizeOptions::default(),
        );
        assert_eq!(out.split_whitespace().collect::<Vec<_>>(), vec!["grazie", "per", "il", "supporto"]);
    }

    #[test]
    fn test_hashtag_word_kept_by_default() {
        let out = normalize("Viva #Italia!", &NormalizeOptions::default());
        assert_eq!(out, "viva  italia ");
    }

    #[test]
    fn test_hashtag_stripped_when_requested() {
        let options = NormalizeOptions {
            strip_hashtags: true,
            ..NormalizeOptions::default()
        };
        let out = normalize("Viva #Italia", &options);
        assert_eq!(out.trim(), "viva");
    }

    #[test]
    fn test_accents_become_spaces() {
        assert_eq!(normalize("Perché", &NormalizeOptions::default()), "perch ");
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(normalize("", &NormalizeOptions::default()), "");
        assert_eq!(normalize("   \t\n", &NormalizeOptions::default()), "");
        assert_eq!(normalize("@only https://x.y", &NormalizeOptions::default()), "");
    }

    #[test]
    fn test_noise_counts() {
        let text = "@a @b #c https://d www.e";
        assert_eq!(NoiseClass::Mention.count(text), 2);
        assert_eq!(NoiseClass::Hashtag.count(text), 1);
        assert_eq!(NoiseClass::Link.count(text), 2);
    }
}
