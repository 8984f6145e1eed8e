//! Source registry: loads source definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/sources/` is baked into the binary
//! at compile time via [`include_str!`].

use crate::source_def::{SourceDefinition, parse_source_toml};

/// TOML configs embedded at compile time.
const SOURCE_TOMLS: &[(&str, &str)] = &[("police_uk", include_str!("../sources/police_uk.toml"))];

/// ID of the source the view uses unless told otherwise.
pub const DEFAULT_SOURCE_ID: &str = "police_uk";

/// Returns all registered source definitions.
///
/// # Panics
///
/// Panics if any embedded TOML config is malformed.
#[must_use]
pub fn all_sources() -> Vec<SourceDefinition> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            parse_source_toml(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse source '{name}': {e}"))
        })
        .collect()
}

/// Looks up a source definition by ID.
fn find_source(id: &str) -> Option<SourceDefinition> {
    all_sources().into_iter().find(|s| s.id == id)
}

/// Returns the default street-level crimes source.
///
/// # Panics
///
/// Panics if the embedded default source is missing.
#[must_use]
pub fn default_source() -> SourceDefinition {
    find_source(DEFAULT_SOURCE_ID)
        .unwrap_or_else(|| panic!("Embedded source '{DEFAULT_SOURCE_ID}' is missing"))
}
