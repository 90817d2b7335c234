// Reporting: per-entity aggregates and descriptive statistics.

pub mod aggregate;
pub mod descriptive;
