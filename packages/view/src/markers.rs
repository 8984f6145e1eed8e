//! Ownership of the markers currently on the map.

use crime_region_crime_models::CrimeRecord;

use crate::map::MapWidget;

/// A marker handle paired with the record it shows.
#[derive(Debug, Clone)]
pub struct Marker<H> {
    /// Widget handle.
    pub handle: H,
    /// Record the marker was created for.
    pub record: CrimeRecord,
}

/// The set of markers currently shown.
///
/// Dropping handles is not enough to take markers off the map, so the set
/// must be emptied through [`clear`](Self::clear).
#[derive(Debug)]
pub struct MarkerSet<H> {
    markers: Vec<Marker<H>>,
}

impl<H> Default for MarkerSet<H> {
    fn default() -> Self {
        Self {
            markers: Vec::new(),
        }
    }
}

impl<H: PartialEq> MarkerSet<H> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether no markers are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Live markers, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Marker<H>> {
        self.markers.iter()
    }

    /// Looks up the record shown by `handle`.
    #[must_use]
    pub fn record_for(&self, handle: &H) -> Option<&CrimeRecord> {
        self.markers
            .iter()
            .find(|m| m.handle == *handle)
            .map(|m| &m.record)
    }

    /// Takes ownership of a marker that is already on the map.
    pub fn push(&mut self, handle: H, record: CrimeRecord) {
        self.markers.push(Marker { handle, record });
    }

    /// Removes every marker from `map`, then empties the set.
    pub fn clear<M>(&mut self, map: &mut M)
    where
        M: MapWidget<Marker = H>,
    {
        for marker in &self.markers {
            map.remove_marker(&marker.handle);
        }
        self.markers.clear();
    }
}
