// Corpus: entities, their raw texts, and the sources that supply them.

pub mod models;
pub mod source;

pub use models::{Corpus, Entity, EntityMap};
