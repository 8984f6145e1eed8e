//! Config-driven crime data source definition.
//!
//! [`SourceDefinition`] captures the endpoint and attribution of a data
//! source in a serializable config struct, loaded from TOML.

use serde::Deserialize;

/// A crime data source definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g., `"police_uk"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Endpoint the `poly` and `date` parameters are appended to.
    pub base_url: String,
    /// Attribution text the data licence requires alongside any display.
    #[serde(default)]
    pub attribution: Option<String>,
}

/// Parses a [`SourceDefinition`] from TOML text.
///
/// # Errors
///
/// Returns the TOML error if the text is malformed or missing fields.
pub fn parse_source_toml(toml_str: &str) -> Result<SourceDefinition, toml::de::Error> {
    toml::from_str(toml_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_definition() {
        let def = parse_source_toml(
            r#"
            id = "local"
            name = "Local mirror"
            base_url = "http://localhost:8080/crimes"
            "#,
        )
        .unwrap();
        assert_eq!(def.id, "local");
        assert_eq!(def.base_url, "http://localhost:8080/crimes");
        assert!(def.attribution.is_none());
    }

    #[test]
    fn rejects_definition_without_url() {
        assert!(parse_source_toml("id = \"x\"\nname = \"y\"").is_err());
    }
}
