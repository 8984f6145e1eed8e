#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Region crime view: the drag-to-query pipeline and marker lifecycle.
//!
//! [`RegionCrimeView`] owns the [`ViewState`] and the [`MarkerSet`] and
//! sequences the pipeline:
//!
//! 1. The user drags the rectangle (or a place search resolves).
//! 2. The rectangle's corners are derived and encoded as a polygon query.
//! 3. A [`PendingFetch`] is handed to the caller, which resolves it against
//!    a [`CrimeDataSource`](crime_region_source::CrimeDataSource).
//! 4. The outcome is applied: old markers are released, one marker per
//!    record is created, and clicking a marker opens a popup.
//!
//! The map itself is an external collaborator behind the [`MapWidget`]
//! trait. [`driver::run`] wires events, fetches and the view together on
//! a single task.

pub mod config;
pub mod driver;
pub mod map;
pub mod markers;
pub mod state;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ViewConfig;
pub use map::MapWidget;
pub use markers::MarkerSet;
pub use state::{ViewError, ViewState};
pub use view::{FetchOutcome, PendingFetch, RegionCrimeView, ViewEvent};
