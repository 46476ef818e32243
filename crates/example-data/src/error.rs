//! Error types for registry loading and data generation.

use thiserror::Error;

/// Errors raised while loading a seed registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry document is not valid JSON or misses required fields.
    #[error("seed registry failed to parse: {0}")]
    Parse(#[from] serde_json::Error),
    /// The registry document declares an unsupported version.
    #[error("unsupported seed registry version: {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version the document declared.
        found: u32,
        /// Version this crate understands.
        expected: u32,
    },
    /// No seed with the requested name exists.
    #[error("unknown seed name: {name}")]
    UnknownSeed {
        /// The requested seed name.
        name: String,
    },
}

/// Errors raised while generating example data.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A seed must produce at least one section.
    #[error("seed `{name}` declares zero sections")]
    EmptySeed {
        /// The offending seed name.
        name: String,
    },
    /// The registry must declare at least one manual part.
    #[error("seed registry declares no manual parts")]
    NoParts,
}
