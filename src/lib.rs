// Ember: entity-partitioned feature engine for social-media text
//
// This is the library root. Each module corresponds to a stage (or a seam to
// an external resource) of the analysis pipeline.

pub mod config;
pub mod corpus;
pub mod embeddings;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod sentiment;
pub mod text;
pub mod topics;
