#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Place search for the region crime view.
//!
//! Turns free text ("King's Cross", "Camden Town") into a
//! [`Place`] with a point and, when the provider knows one, a viewport.
//! The only bundled provider is Nominatim / `OpenStreetMap`, configured by
//! an embedded TOML file in `services/`.

pub mod nominatim;
pub mod service_registry;

use async_trait::async_trait;
use crime_region_geography_models::Place;
use thiserror::Error;

/// Errors from place search operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,
}

/// Free-text to place resolution.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Resolves `query` to a place.
    ///
    /// Returns `Ok(None)` when nothing was selected (no match at all). A
    /// returned [`Place`] may still lack geometry; the view reports that
    /// case to the user.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the provider could not be reached or
    /// answered with something unreadable.
    async fn search(&self, query: &str) -> Result<Option<Place>, GeocodeError>;
}
