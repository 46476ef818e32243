//! JSON seed registry: named seeds and the manual parts they draw from.

use serde::Deserialize;

use crate::error::RegistryError;

const SUPPORTED_VERSION: u32 = 1;

/// One named seed definition.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeedDefinition {
    /// Seed name referenced by callers.
    pub name: String,
    /// RNG seed value.
    pub seed: u64,
    /// Number of manual sections to generate.
    pub section_count: usize,
    /// Number of reviewer identities to generate.
    #[serde(default)]
    pub reviewer_count: usize,
}

/// Registry of seeds plus the manual parts sections are spread across.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SeedRegistry {
    version: u32,
    parts: Vec<String>,
    seeds: Vec<SeedDefinition>,
}

impl SeedRegistry {
    /// Parse a registry document, rejecting unsupported versions.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let registry: Self = serde_json::from_str(json)?;
        if registry.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                found: registry.version,
                expected: SUPPORTED_VERSION,
            });
        }
        Ok(registry)
    }

    /// Manual parts sections are assigned to, in declaration order.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Look up a seed by name.
    pub fn find_seed(&self, name: &str) -> Result<&SeedDefinition, RegistryError> {
        self.seeds
            .iter()
            .find(|seed| seed.name == name)
            .ok_or_else(|| RegistryError::UnknownSeed {
                name: name.to_owned(),
            })
    }
}
