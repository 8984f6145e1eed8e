//! View state: the single source of truth all rendering derives from.

use std::sync::Arc;

use crime_region_crime_models::{CrimeRecord, YearMonth};
use crime_region_geography_models::PolygonQuery;

/// Message shown when a place search resolves without a location.
pub const SEARCH_ERROR_MESSAGE: &str = "There was a problem with the search.";

/// A failure surfaced to the user as an inline message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    /// The selected place had no resolvable geometry.
    #[error("There was a problem with the search.")]
    Search,

    /// The crime data request failed (transport, status or body).
    #[error("{message}")]
    DataFetch {
        /// Description of the failure.
        message: String,
    },
}

/// Snapshot of everything the view displays.
///
/// Never mutated in place: each transition builds a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Whether a fetch was started and no response has landed since.
    pub loading: bool,
    /// Last error, cleared by the next successful fetch.
    pub error: Option<ViewError>,
    /// Records behind the current markers.
    pub records: Arc<[CrimeRecord]>,
    /// Polygon of the most recently requested region.
    pub polygon: Option<PolygonQuery>,
    /// Month every query is scoped to.
    pub month: YearMonth,
}

impl ViewState {
    /// Initial state before any query has been issued.
    #[must_use]
    pub fn new(month: YearMonth) -> Self {
        Self {
            loading: false,
            error: None,
            records: Arc::from(Vec::new()),
            polygon: None,
            month,
        }
    }

    /// A fetch for `polygon` has started. Records and error are kept.
    #[must_use]
    pub fn loading(&self, polygon: PolygonQuery) -> Self {
        Self {
            loading: true,
            error: self.error.clone(),
            records: Arc::clone(&self.records),
            polygon: Some(polygon),
            month: self.month,
        }
    }

    /// A fetch succeeded with `records`.
    #[must_use]
    pub fn loaded(&self, records: Vec<CrimeRecord>) -> Self {
        Self {
            loading: false,
            error: None,
            records: Arc::from(records),
            polygon: self.polygon.clone(),
            month: self.month,
        }
    }

    /// A fetch or search failed. Records are kept.
    #[must_use]
    pub fn failed(&self, error: ViewError) -> Self {
        Self {
            loading: false,
            error: Some(error),
            records: Arc::clone(&self.records),
            polygon: self.polygon.clone(),
            month: self.month,
        }
    }

    /// Inline message to display, if any.
    #[must_use]
    pub fn status_message(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|e| format!("There was an error: {e}"))
    }
}
