//! Genetics module - bounded genes and the genomes built from them.

pub mod gene;
pub mod genome;

pub use gene::Gene;
pub use genome::{GeneKind, Genome};
