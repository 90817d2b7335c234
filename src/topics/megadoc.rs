// Mega-documents: one concatenated document per entity.
//
// TF-IDF treats each entity as a single document, so a term's document
// frequency counts entities, never individual posts.

use crate::corpus::EntityMap;

/// Join each entity's cleaned texts with single spaces.
///
/// Empty cleaned texts are skipped so they don't leave doubled separators.
/// An entity with no texts gets an empty mega-document.
pub fn build_mega_documents(cleaned: &EntityMap<Vec<String>>) -> EntityMap<String> {
    cleaned.map(|_, texts| {
        texts
            .iter()
            .filter(|t| !t.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    })
}
