#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Street-level crime record types and display helpers.
//!
//! Crime records arrive from the police data API as loosely typed JSON.
//! This crate defines the [`CrimeRecord`] shape the rest of the workspace
//! consumes, the [`YearMonth`] date filter that scopes every query, and the
//! [`PoliceCategory`] slugs the API uses for `category`.

mod record;

pub use record::{CategoryCounts, CrimeLocation, CrimeRecord, OutcomeStatus, Street};

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Turns an API slug like `"anti-social-behaviour"` into a display title.
///
/// Every hyphen becomes a space and only the first character of the result
/// is uppercased: `"anti-social-behaviour"` -> `"Anti social behaviour"`.
#[must_use]
pub fn format_title(slug: &str) -> String {
    let spaced = slug.replace('-', " ");
    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Street-level crime categories reported by the police data API.
///
/// Records are not rejected for carrying a slug outside this list; see
/// [`CrimeRecord::police_category`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PoliceCategory {
    /// Personal, environmental and nuisance anti-social behaviour
    AntiSocialBehaviour,
    /// Theft of a bicycle
    BicycleTheft,
    /// Entry to a building to steal or cause damage
    Burglary,
    /// Criminal damage and arson
    CriminalDamageArson,
    /// Possession, supply and production of drugs
    Drugs,
    /// Theft not covered by a more specific category
    OtherTheft,
    /// Possession of a weapon
    PossessionOfWeapons,
    /// Offences causing fear, alarm or distress
    PublicOrder,
    /// Taking property by force or threat
    Robbery,
    /// Theft from a shop or stall
    Shoplifting,
    /// Theft from the person, without force
    TheftFromThePerson,
    /// Theft of or from a vehicle
    VehicleCrime,
    /// Violence and sexual offences
    ViolentCrime,
    /// Crimes not covered by any other category
    OtherCrime,
}

impl PoliceCategory {
    /// Returns the display title of this category (see [`format_title`]).
    #[must_use]
    pub fn label(self) -> String {
        format_title(self.as_ref())
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::AntiSocialBehaviour,
            Self::BicycleTheft,
            Self::Burglary,
            Self::CriminalDamageArson,
            Self::Drugs,
            Self::OtherTheft,
            Self::PossessionOfWeapons,
            Self::PublicOrder,
            Self::Robbery,
            Self::Shoplifting,
            Self::TheftFromThePerson,
            Self::VehicleCrime,
            Self::ViolentCrime,
            Self::OtherCrime,
        ]
    }
}

/// A calendar month used to scope a crime query, formatted `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

/// Month the view queries when nothing else is configured.
pub const DEFAULT_MONTH: YearMonth = YearMonth {
    year: 2017,
    month: 9,
};

impl YearMonth {
    /// Creates a year-month pair.
    ///
    /// # Errors
    ///
    /// Returns an error if `month` is not in the range 1-12 or the year
    /// cannot be represented as a calendar date.
    pub fn new(year: i32, month: u32) -> Result<Self, InvalidYearMonthError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|date| Self {
                year: date.year(),
                month: date.month(),
            })
            .ok_or_else(|| InvalidYearMonthError {
                value: format!("{year}-{month:02}"),
            })
    }

    /// The calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// The month number, 1-12.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }
}

impl Default for YearMonth {
    fn default() -> Self {
        DEFAULT_MONTH
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = InvalidYearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidYearMonthError {
            value: s.to_string(),
        };

        // Exactly `YYYY-MM`; chrono alone would accept `2017-9`.
        let bytes = s.as_bytes();
        if bytes.len() != 7 || bytes[4] != b'-' {
            return Err(invalid());
        }

        let date =
            NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").map_err(|_| invalid())?;
        Ok(Self {
            year: date.year(),
            month: date.month(),
        })
    }
}

impl Serialize for YearMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error returned when a string is not a valid `YYYY-MM` month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidYearMonthError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidYearMonthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid month {:?}: expected YYYY-MM", self.value)
    }
}

impl std::error::Error for InvalidYearMonthError {}
