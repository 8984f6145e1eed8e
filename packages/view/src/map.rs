//! The map widget contract.

use crime_region_geography_models::{LatLng, LatLngBounds, compute_offset};

/// An interactive map with one draggable rectangle, point markers and a
/// single info popup.
///
/// Implementations wrap a concrete map SDK. All calls happen on the UI
/// thread; none of them may block.
pub trait MapWidget {
    /// Handle to a marker placed with [`add_marker`](Self::add_marker).
    type Marker: Clone + PartialEq + std::fmt::Debug;

    /// Centres the map on `center`.
    fn set_center(&mut self, center: LatLng);

    /// Sets the zoom level.
    fn set_zoom(&mut self, zoom: u8);

    /// Pans and zooms so that `bounds` is fully visible.
    fn fit_bounds(&mut self, bounds: LatLngBounds);

    /// Creates the region rectangle. Called once, on mount.
    fn create_rectangle(&mut self, bounds: LatLngBounds, draggable: bool);

    /// Current bounds of the rectangle, or `None` before it exists.
    fn rectangle_bounds(&self) -> Option<LatLngBounds>;

    /// Moves the rectangle to `bounds`.
    fn set_rectangle_bounds(&mut self, bounds: LatLngBounds);

    /// Shows a marker at `position` with a hover title.
    fn add_marker(&mut self, position: LatLng, title: &str) -> Self::Marker;

    /// Stops showing `marker`. The handle is not used again afterwards.
    fn remove_marker(&mut self, marker: &Self::Marker);

    /// Sets the popup content (HTML) and opens it anchored to `anchor`.
    fn open_popup(&mut self, content: &str, anchor: &Self::Marker);

    /// Point `distance_m` metres from `from` along `heading_deg`.
    ///
    /// Defaults to spherical geometry on the web-map earth radius.
    fn compute_offset(&self, from: LatLng, distance_m: f64, heading_deg: f64) -> LatLng {
        compute_offset(from, distance_m, heading_deg)
    }
}
