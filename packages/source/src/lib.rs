#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crime data source trait and the police data API client.
//!
//! A [`CrimeDataSource`] answers one question: which crimes were reported
//! inside a polygon during a month. [`police_uk::PoliceUkSource`] answers
//! it with a single HTTP GET against the street-level crimes endpoint.

pub mod police_uk;
pub mod registry;
pub mod source_def;

use async_trait::async_trait;
use crime_region_crime_models::{CrimeRecord, YearMonth};
use crime_region_geography_models::PolygonQuery;

/// Errors that can occur while fetching crime data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed (connection, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Response status code.
        status: reqwest::StatusCode,
        /// Requested URL.
        url: String,
    },

    /// The response body was not a JSON array of crime records.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured endpoint could not be turned into a request URL.
    #[error("Invalid request URL {url:?}: {message}")]
    InvalidUrl {
        /// The configured base URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },
}

/// Trait that every crime data provider implements.
#[async_trait]
pub trait CrimeDataSource: Send + Sync {
    /// Returns a unique identifier for this source (e.g., `"police_uk"`).
    fn id(&self) -> &str;

    /// Fetches every crime reported inside `polygon` during `month`.
    ///
    /// Issues exactly one request. No retry, timeout or cancellation is
    /// applied here; callers decide what to do with a failure.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure, a non-2xx status, or a
    /// body that does not parse as a list of crime records.
    async fn fetch_crimes(
        &self,
        polygon: &PolygonQuery,
        month: YearMonth,
    ) -> Result<Vec<CrimeRecord>, SourceError>;
}
