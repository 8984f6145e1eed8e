//! The street-level crime record as returned by the police data API.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::{PoliceCategory, format_title};

/// One reported crime.
///
/// Only `category`, `month` and the location are needed to render a
/// marker; the remaining fields are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimeRecord {
    /// Category slug (e.g., `"anti-social-behaviour"`).
    pub category: String,
    /// Month the crime occurred, as reported (`YYYY-MM`).
    pub month: String,
    /// Approximate (anonymised) location.
    pub location: CrimeLocation,
    /// API record ID.
    #[serde(default)]
    pub id: Option<u64>,
    /// Stable identifier shared with the outcomes API. Empty for
    /// anti-social behaviour.
    #[serde(default)]
    pub persistent_id: Option<String>,
    /// `"Force"` or `"BTP"` (British Transport Police).
    #[serde(default)]
    pub location_type: Option<String>,
    /// Location subtype for BTP records.
    #[serde(default)]
    pub location_subtype: Option<String>,
    /// Extra free-text context, usually empty.
    #[serde(default)]
    pub context: Option<String>,
    /// Latest recorded outcome, if any.
    #[serde(default)]
    pub outcome_status: Option<OutcomeStatus>,
}

/// Where a crime occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimeLocation {
    /// Latitude (WGS84). The API sends this as a numeric string.
    #[serde(deserialize_with = "de_coordinate")]
    pub latitude: f64,
    /// Longitude (WGS84). The API sends this as a numeric string.
    #[serde(deserialize_with = "de_coordinate")]
    pub longitude: f64,
    /// The snap point street.
    pub street: Street,
}

/// A street the location was snapped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Street {
    /// Street ID.
    #[serde(default)]
    pub id: Option<u64>,
    /// Street description (e.g., `"On or near Theobald's Road"`).
    pub name: String,
}

/// The most recent outcome of a crime investigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeStatus {
    /// Outcome category description.
    pub category: String,
    /// Month of the outcome (`YYYY-MM`).
    pub date: String,
}

impl CrimeRecord {
    /// Returns the display title of this record's category.
    #[must_use]
    pub fn title(&self) -> String {
        format_title(&self.category)
    }

    /// Returns the known category for this record, or `None` when the API
    /// sent a slug outside [`PoliceCategory`].
    #[must_use]
    pub fn police_category(&self) -> Option<PoliceCategory> {
        self.category.parse().ok()
    }

    /// Name of the street the crime was snapped to.
    #[must_use]
    pub fn street_name(&self) -> &str {
        &self.location.street.name
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

fn de_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid coordinate {s:?}: {e}"))),
    }
}

/// Record counts per [`PoliceCategory`], with slugs the enum does not know
/// counted separately under their raw slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    known: BTreeMap<PoliceCategory, usize>,
    unknown: BTreeMap<String, usize>,
}

impl CategoryCounts {
    /// Counts `records` by category.
    #[must_use]
    pub fn tally<'a>(records: impl IntoIterator<Item = &'a CrimeRecord>) -> Self {
        let mut counts = Self::default();
        for record in records {
            match record.police_category() {
                Some(category) => *counts.known.entry(category).or_default() += 1,
                None => *counts.unknown.entry(record.category.clone()).or_default() += 1,
            }
        }
        counts
    }

    /// Known categories with at least one record, in [`PoliceCategory::all`]
    /// order.
    pub fn known(&self) -> impl Iterator<Item = (PoliceCategory, usize)> + '_ {
        PoliceCategory::all()
            .iter()
            .filter_map(|category| self.known.get(category).map(|n| (*category, *n)))
    }

    /// Unrecognised slugs and their counts, sorted by slug.
    pub fn unknown(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.unknown.iter().map(|(slug, n)| (slug.as_str(), *n))
    }

    /// Number of records counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.known.values().chain(self.unknown.values()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_api_record() {
        let body = serde_json::json!({
            "category": "anti-social-behaviour",
            "location_type": "Force",
            "location": {
                "latitude": "51.520776",
                "street": { "id": 960_855, "name": "On or near Theobald's Road" },
                "longitude": "-0.118611"
            },
            "context": "",
            "outcome_status": null,
            "persistent_id": "",
            "id": 59_934_213,
            "location_subtype": "",
            "month": "2017-09"
        });

        let record: CrimeRecord = serde_json::from_value(body).unwrap();
        assert_eq!(record.category, "anti-social-behaviour");
        assert_eq!(record.month, "2017-09");
        assert!((record.location.latitude - 51.520_776).abs() < 1e-9);
        assert!((record.location.longitude - -0.118_611).abs() < 1e-9);
        assert_eq!(record.street_name(), "On or near Theobald's Road");
        assert_eq!(record.id, Some(59_934_213));
        assert!(record.outcome_status.is_none());
        assert_eq!(record.title(), "Anti social behaviour");
        assert_eq!(
            record.police_category(),
            Some(PoliceCategory::AntiSocialBehaviour)
        );
    }

    #[test]
    fn accepts_numeric_coordinates_and_missing_optionals() {
        let body = serde_json::json!({
            "category": "bicycle-theft",
            "month": "2017-09",
            "location": {
                "latitude": 51.5,
                "longitude": -0.12,
                "street": { "name": "On or near Gray's Inn Road" }
            },
            "outcome_status": { "category": "Under investigation", "date": "2017-10" }
        });

        let record: CrimeRecord = serde_json::from_value(body).unwrap();
        assert!((record.location.latitude - 51.5).abs() < 1e-9);
        assert!(record.location.street.id.is_none());
        assert_eq!(
            record.outcome_status.unwrap().category,
            "Under investigation"
        );
    }

    #[test]
    fn rejects_non_numeric_coordinate() {
        let body = serde_json::json!({
            "category": "drugs",
            "month": "2017-09",
            "location": {
                "latitude": "north",
                "longitude": "-0.12",
                "street": { "name": "On or near Kingsway" }
            }
        });

        assert!(serde_json::from_value::<CrimeRecord>(body).is_err());
    }

    #[test]
    fn unknown_category_is_kept_as_is() {
        let body = serde_json::json!({
            "category": "some-new-category",
            "month": "2017-09",
            "location": {
                "latitude": "51.5",
                "longitude": "-0.12",
                "street": { "name": "On or near Kingsway" }
            }
        });

        let record: CrimeRecord = serde_json::from_value(body).unwrap();
        assert_eq!(record.police_category(), None);
        assert_eq!(record.title(), "Some new category");
    }

    fn record(category: &str) -> CrimeRecord {
        serde_json::from_value(serde_json::json!({
            "category": category,
            "month": "2017-09",
            "location": {
                "latitude": "51.5",
                "longitude": "-0.12",
                "street": { "name": "On or near Kingsway" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn category_counts_split_known_and_unknown_slugs() {
        let records = [
            record("vehicle-crime"),
            record("burglary"),
            record("vehicle-crime"),
            record("some-new-category"),
            record("another-new-one"),
            record("some-new-category"),
        ];

        let counts = CategoryCounts::tally(&records);

        assert_eq!(
            counts.known().collect::<Vec<_>>(),
            vec![
                (PoliceCategory::Burglary, 1),
                (PoliceCategory::VehicleCrime, 2),
            ]
        );
        assert_eq!(
            counts.unknown().collect::<Vec<_>>(),
            vec![("another-new-one", 1), ("some-new-category", 2)]
        );
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn category_counts_of_nothing_is_empty() {
        let records: Vec<CrimeRecord> = Vec::new();
        let counts = CategoryCounts::tally(&records);
        assert_eq!(counts.known().count(), 0);
        assert_eq!(counts.unknown().count(), 0);
        assert_eq!(counts.total(), 0);
    }
}
