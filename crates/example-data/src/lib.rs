//! Deterministic example data for the bench-manual review client.
//!
//! This crate generates believable, reproducible manual sections and
//! reviewer identities from a JSON seed registry. It is independent of the
//! client's domain types to avoid circular dependencies; consumers convert
//! the plain structs into whatever shapes they need.
//!
//! # Example
//!
//! ```
//! use example_data::{SeedRegistry, generate_example_sections};
//!
//! let json = r#"{
//!     "version": 1,
//!     "parts": ["PART I"],
//!     "seeds": [{"name": "demo", "seed": 42, "sectionCount": 2}]
//! }"#;
//!
//! let registry = SeedRegistry::from_json(json).expect("valid registry");
//! let seed = registry.find_seed("demo").expect("seed exists");
//! let sections = generate_example_sections(&registry, seed).expect("generation succeeds");
//!
//! assert_eq!(sections.len(), 2);
//! ```

mod error;
mod generator;
mod registry;

pub use error::{GenerationError, RegistryError};
pub use generator::{
    ExampleReviewer, ExampleSection, generate_example_reviewers, generate_example_sections,
};
pub use registry::{SeedDefinition, SeedRegistry};
