//! Deterministic generation of sections and reviewer identities.
//!
//! All randomness flows through a ChaCha RNG seeded from the seed
//! definition, so the same registry and seed name always produce the same
//! data.

use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::faker::name::en::{FirstName, LastName};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GenerationError;
use crate::registry::{SeedDefinition, SeedRegistry};

/// One generated manual section, independent of any client domain types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleSection {
    /// Opaque stable identifier.
    pub id: String,
    /// Citation code, for example `2.4`.
    pub code: String,
    /// Section heading.
    pub title: String,
    /// Manual part the section belongs to.
    pub part: String,
    /// Draft provision text.
    pub content: String,
}

/// One generated reviewer identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleReviewer {
    /// Opaque stable identifier.
    pub id: String,
    /// Judicial service number, for example `PJ1001`.
    pub pj: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
}

fn stable_id(rng: &mut ChaCha8Rng) -> String {
    Uuid::from_u128(rng.random()).simple().to_string()
}

/// Generate the sections a seed declares, spread across the registry's
/// manual parts in order.
pub fn generate_example_sections(
    registry: &SeedRegistry,
    seed: &SeedDefinition,
) -> Result<Vec<ExampleSection>, GenerationError> {
    if seed.section_count == 0 {
        return Err(GenerationError::EmptySeed {
            name: seed.name.clone(),
        });
    }
    let parts = registry.parts();
    if parts.is_empty() {
        return Err(GenerationError::NoParts);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed.seed);
    let per_part = seed.section_count.div_ceil(parts.len());

    let mut sections = Vec::with_capacity(seed.section_count);
    for index in 0..seed.section_count {
        let part_index = (index / per_part).min(parts.len() - 1);
        let part = parts
            .get(part_index)
            .ok_or(GenerationError::NoParts)?
            .clone();
        let title: String = Sentence(3..7).fake_with_rng(&mut rng);
        let content: String = Paragraph(2..5).fake_with_rng(&mut rng);
        sections.push(ExampleSection {
            id: stable_id(&mut rng),
            code: format!("{}.{}", part_index + 1, index - part_index * per_part + 1),
            title: title.trim_end_matches('.').to_owned(),
            part,
            content,
        });
    }
    Ok(sections)
}

/// Generate the reviewer identities a seed declares.
#[must_use]
pub fn generate_example_reviewers(seed: &SeedDefinition) -> Vec<ExampleReviewer> {
    // Offset the stream so reviewers do not mirror section randomness.
    let mut rng = ChaCha8Rng::seed_from_u64(seed.seed.wrapping_add(1));
    (0..seed.reviewer_count)
        .map(|index| {
            let first_name: String = FirstName().fake_with_rng(&mut rng);
            let last_name: String = LastName().fake_with_rng(&mut rng);
            let email: String = SafeEmail().fake_with_rng(&mut rng);
            ExampleReviewer {
                id: stable_id(&mut rng),
                pj: format!("PJ{}", 1001 + index),
                first_name,
                last_name,
                email,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::registry::SeedRegistry;

    const REGISTRY_JSON: &str = r#"{
        "version": 1,
        "parts": ["PART I", "PART II"],
        "seeds": [
            {"name": "bench-review", "seed": 42, "sectionCount": 5, "reviewerCount": 3},
            {"name": "empty", "seed": 7, "sectionCount": 0}
        ]
    }"#;

    fn registry() -> SeedRegistry {
        SeedRegistry::from_json(REGISTRY_JSON).expect("registry should parse")
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let registry = registry();
        let seed = registry.find_seed("bench-review").expect("seed exists");
        let first = generate_example_sections(&registry, seed).expect("generation succeeds");
        let second = generate_example_sections(&registry, seed).expect("generation succeeds");
        assert_eq!(first, second);
    }

    #[test]
    fn sections_have_unique_ids_and_cover_all_parts() {
        let registry = registry();
        let seed = registry.find_seed("bench-review").expect("seed exists");
        let sections = generate_example_sections(&registry, seed).expect("generation succeeds");

        assert_eq!(sections.len(), 5);
        let mut ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 5, "section ids must be unique");

        let parts: Vec<&str> = sections.iter().map(|s| s.part.as_str()).collect();
        assert!(parts.contains(&"PART I") && parts.contains(&"PART II"));
    }

    #[test]
    fn zero_section_seeds_are_rejected() {
        let registry = registry();
        let seed = registry.find_seed("empty").expect("seed exists");
        let err = generate_example_sections(&registry, seed).expect_err("must fail");
        assert!(matches!(err, GenerationError::EmptySeed { .. }));
    }

    #[test]
    fn reviewers_get_sequential_service_numbers() {
        let registry = registry();
        let seed = registry.find_seed("bench-review").expect("seed exists");
        let reviewers = generate_example_reviewers(seed);
        let numbers: Vec<&str> = reviewers.iter().map(|r| r.pj.as_str()).collect();
        assert_eq!(numbers, ["PJ1001", "PJ1002", "PJ1003"]);
    }
}
