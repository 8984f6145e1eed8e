//! Compile-time registry of place search service configurations.
//!
//! Each provider is defined in a TOML file under `services/`. The registry
//! embeds these at compile time and exposes them via [`all_services`].

use serde::Deserialize;

/// A place search service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchService {
    /// Unique identifier (e.g., `"nominatim"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// API base URL (e.g., `"https://nominatim.openstreetmap.org/search"`).
    pub base_url: String,
    /// Comma-separated ISO country codes results are restricted to.
    #[serde(default)]
    pub country_codes: Option<String>,
    /// `User-Agent` header sent with every request. Nominatim's usage
    /// policy rejects requests without an identifying agent.
    pub user_agent: String,
}

// ── Compile-time embedded TOML files ────────────────────────────────

const SERVICE_TOMLS: &[(&str, &str)] = &[("nominatim", include_str!("../services/nominatim.toml"))];

/// Returns all place search service configurations.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_services() -> Vec<SearchService> {
    SERVICE_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse search service '{name}': {e}"))
        })
        .collect()
}

/// Returns the Nominatim service configuration.
///
/// # Panics
///
/// Panics if the embedded Nominatim config is missing.
#[must_use]
pub fn nominatim_service() -> SearchService {
    all_services()
        .into_iter()
        .find(|s| s.id == "nominatim")
        .unwrap_or_else(|| panic!("Embedded search service 'nominatim' is missing"))
}
