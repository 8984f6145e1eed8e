//! Headless [`MapWidget`] that keeps map state in memory and traces every
//! call to the log.

use std::collections::BTreeMap;

use crime_region_geography_models::{LatLng, LatLngBounds};
use crime_region_view::MapWidget;

/// Identifier handed out for each plotted marker.
pub type MarkerId = u64;

#[derive(Debug, Default)]
pub struct TerminalMap {
    center: Option<LatLng>,
    zoom: Option<u8>,
    rectangle: Option<LatLngBounds>,
    markers: BTreeMap<MarkerId, LatLng>,
    popup: Option<(MarkerId, String)>,
    next_id: MarkerId,
}

impl TerminalMap {
    #[must_use]
    pub const fn center(&self) -> Option<LatLng> {
        self.center
    }

    #[must_use]
    pub const fn zoom(&self) -> Option<u8> {
        self.zoom
    }

    #[must_use]
    pub const fn rectangle(&self) -> Option<LatLngBounds> {
        self.rectangle
    }

    /// Marker positions in the order they were added.
    pub fn markers(&self) -> impl Iterator<Item = (MarkerId, LatLng)> + '_ {
        self.markers.iter().map(|(id, position)| (*id, *position))
    }

    /// Content and anchor of the open popup.
    #[must_use]
    pub fn popup(&self) -> Option<(MarkerId, &str)> {
        self.popup
            .as_ref()
            .map(|(anchor, content)| (*anchor, content.as_str()))
    }
}

impl MapWidget for TerminalMap {
    type Marker = MarkerId;

    fn set_center(&mut self, center: LatLng) {
        log::trace!("map: center {center}");
        self.center = Some(center);
    }

    fn set_zoom(&mut self, zoom: u8) {
        log::trace!("map: zoom {zoom}");
        self.zoom = Some(zoom);
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        log::trace!(
            "map: fit {} to {}",
            bounds.south_west,
            bounds.north_east
        );
        self.center = Some(bounds.center());
    }

    fn create_rectangle(&mut self, bounds: LatLngBounds, draggable: bool) {
        log::trace!(
            "map: rectangle {} to {} (draggable: {draggable})",
            bounds.south_west,
            bounds.north_east
        );
        self.rectangle = Some(bounds);
    }

    fn rectangle_bounds(&self) -> Option<LatLngBounds> {
        self.rectangle
    }

    fn set_rectangle_bounds(&mut self, bounds: LatLngBounds) {
        log::trace!(
            "map: move rectangle to {} to {}",
            bounds.south_west,
            bounds.north_east
        );
        self.rectangle = Some(bounds);
    }

    fn add_marker(&mut self, position: LatLng, title: &str) -> MarkerId {
        self.next_id += 1;
        let id = self.next_id;
        log::trace!("map: marker #{id} {title:?} at {position}");
        self.markers.insert(id, position);
        id
    }

    fn remove_marker(&mut self, marker: &MarkerId) {
        log::trace!("map: remove marker #{marker}");
        self.markers.remove(marker);
        if self.popup.as_ref().is_some_and(|(anchor, _)| anchor == marker) {
            self.popup = None;
        }
    }

    fn open_popup(&mut self, content: &str, anchor: &MarkerId) {
        log::trace!("map: popup on #{anchor}");
        self.popup = Some((*anchor, content.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removing_anchor_closes_popup() {
        let mut map = TerminalMap::default();
        let a = map.add_marker(LatLng::new(51.52, -0.12), "Burglary");
        let b = map.add_marker(LatLng::new(51.53, -0.12), "Drugs");
        map.open_popup("Burglary<br />2017-09 On or near Kingsway", &a);

        map.remove_marker(&b);
        assert_eq!(map.popup().map(|(anchor, _)| anchor), Some(a));

        map.remove_marker(&a);
        assert!(map.popup().is_none());
        assert_eq!(map.markers().count(), 0);
    }

    #[test]
    fn fit_bounds_recentres() {
        let mut map = TerminalMap::default();
        map.fit_bounds(LatLngBounds::new(
            LatLng::new(51.0, -1.0),
            LatLng::new(52.0, 0.0),
        ));
        assert_eq!(map.center(), Some(LatLng::new(51.5, -0.5)));
    }
}
