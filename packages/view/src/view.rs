//! The region crime view orchestrator.

use crime_region_crime_models::{CrimeRecord, YearMonth};
use crime_region_geography_models::{
    LatLng, LatLngBounds, Place, PolygonQuery, Region, make_bounds,
};
use crime_region_source::{CrimeDataSource, SourceError};

use crate::config::ViewConfig;
use crate::map::MapWidget;
use crate::markers::MarkerSet;
use crate::state::{ViewError, ViewState};

/// Something the user did on the map.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent<H> {
    /// The rectangle was dropped after a drag.
    RegionDragged,
    /// The place search widget changed selection. `None` means nothing
    /// was selected.
    PlaceChanged(Option<Place>),
    /// A marker was clicked.
    MarkerClicked(H),
}

/// A crime query that has been issued but not yet resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFetch {
    /// Issue order, starting at 1 for the mount query.
    pub seq: u64,
    /// Region the query covers.
    pub region: Region,
    /// Encoded polygon sent as `poly`.
    pub polygon: PolygonQuery,
    /// Month sent as `date`.
    pub month: YearMonth,
}

impl PendingFetch {
    /// Runs the query against `source`.
    pub async fn resolve<S>(self, source: &S) -> FetchOutcome
    where
        S: CrimeDataSource + ?Sized,
    {
        let result = source.fetch_crimes(&self.polygon, self.month).await;
        FetchOutcome {
            request: self,
            result,
        }
    }
}

/// A resolved query, ready to be applied to the view.
#[derive(Debug)]
pub struct FetchOutcome {
    /// The query that produced this outcome.
    pub request: PendingFetch,
    /// Records, or why there are none.
    pub result: Result<Vec<CrimeRecord>, SourceError>,
}

/// Owns the view state and the markers, and sequences the
/// drag -> query -> render pipeline on top of a [`MapWidget`].
#[derive(Debug)]
pub struct RegionCrimeView<M: MapWidget> {
    map: M,
    config: ViewConfig,
    state: ViewState,
    markers: MarkerSet<M::Marker>,
    issued: u64,
    latest_applied: u64,
}

impl<M: MapWidget> RegionCrimeView<M> {
    /// Sets up the map and the region rectangle and issues the first query.
    ///
    /// The map is centred on the configured point at the configured zoom,
    /// and a draggable region of the configured size is centred on it.
    pub fn mount(mut map: M, config: ViewConfig) -> (Self, Option<PendingFetch>) {
        let center = config.initial_center;
        map.set_center(center);
        map.set_zoom(config.zoom);

        let bounds = region_bounds(&map, &config, center);
        map.create_rectangle(bounds, true);
        log::debug!("Mounted view at {center} (zoom {})", config.zoom);

        let mut view = Self {
            map,
            state: ViewState::new(config.month),
            config,
            markers: MarkerSet::new(),
            issued: 0,
            latest_applied: 0,
        };
        let pending = view.on_region_changed();
        (view, pending)
    }

    /// Releases every marker and hands the map back.
    #[must_use]
    pub fn unmount(mut self) -> M {
        self.markers.clear(&mut self.map);
        self.map
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// Markers currently shown.
    #[must_use]
    pub const fn markers(&self) -> &MarkerSet<M::Marker> {
        &self.markers
    }

    /// The underlying map widget.
    #[must_use]
    pub const fn map(&self) -> &M {
        &self.map
    }

    /// Configuration the view was mounted with.
    #[must_use]
    pub const fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Dispatches a user event. Returns the query it issued, if any.
    pub fn handle_event(&mut self, event: ViewEvent<M::Marker>) -> Option<PendingFetch> {
        match event {
            ViewEvent::RegionDragged => self.on_region_changed(),
            ViewEvent::PlaceChanged(None) => None,
            ViewEvent::PlaceChanged(Some(place)) => self.on_place_resolved(&place),
            ViewEvent::MarkerClicked(handle) => {
                self.on_marker_clicked(&handle);
                None
            }
        }
    }

    /// Re-reads the rectangle, encodes its corners and starts a query.
    ///
    /// Returns `None` only if the map has no rectangle.
    pub fn on_region_changed(&mut self) -> Option<PendingFetch> {
        let Some(bounds) = self.map.rectangle_bounds() else {
            log::warn!("Region changed but the map has no rectangle");
            return None;
        };

        let region = Region::new(bounds);
        let polygon = region.polygon_query();
        log::debug!("Region changed: poly={polygon}");
        Some(self.start_fetch(region, polygon))
    }

    fn start_fetch(&mut self, region: Region, polygon: PolygonQuery) -> PendingFetch {
        self.issued += 1;
        self.state = self.state.loading(polygon.clone());
        PendingFetch {
            seq: self.issued,
            region,
            polygon,
            month: self.state.month,
        }
    }

    /// Applies a resolved query.
    ///
    /// Outcomes are applied in arrival order, whatever order the queries
    /// were issued in: a slow earlier query that lands after a newer one
    /// overwrites it.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome) {
        let FetchOutcome { request, result } = outcome;

        if request.seq < self.latest_applied {
            log::warn!(
                "Applying query #{} after newer query #{} already landed",
                request.seq,
                self.latest_applied
            );
        } else if request.seq < self.issued {
            log::debug!(
                "Query #{} landed while #{} is outstanding",
                request.seq,
                self.issued
            );
        }
        self.latest_applied = self.latest_applied.max(request.seq);

        match result {
            Ok(records) => {
                let outside = records
                    .iter()
                    .filter(|r| !request.region.contains(record_position(r)))
                    .count();
                if outside > 0 {
                    log::debug!(
                        "{outside} of {} records fall outside the queried region",
                        records.len()
                    );
                }
                self.state = self.state.loaded(records);
                self.render_markers();
            }
            Err(e) => {
                log::warn!("Crime data fetch #{} failed: {e}", request.seq);
                self.state = self.state.failed(ViewError::DataFetch {
                    message: e.to_string(),
                });
            }
        }
    }

    /// Replaces every marker with one per current record.
    ///
    /// All old markers are released before the first new one is created.
    pub fn render_markers(&mut self) {
        self.markers.clear(&mut self.map);

        for record in self.state.records.iter() {
            let handle = self.map.add_marker(record_position(record), &record.title());
            self.markers.push(handle, record.clone());
        }
        log::debug!("Rendered {} markers", self.markers.len());
    }

    /// Opens the popup for `handle`. Returns the popup content, or `None`
    /// if the handle is not a live marker.
    pub fn on_marker_clicked(&mut self, handle: &M::Marker) -> Option<String> {
        let Some(record) = self.markers.record_for(handle) else {
            log::debug!("Click on unknown marker {handle:?}");
            return None;
        };
        let content = popup_content(record);
        self.map.open_popup(&content, handle);
        Some(content)
    }

    /// Moves the region to a resolved place and starts a query.
    ///
    /// A place without geometry records [`ViewError::Search`] and issues no
    /// query.
    pub fn on_place_resolved(&mut self, place: &Place) -> Option<PendingFetch> {
        let Some(geometry) = place.geometry else {
            log::warn!("Place {:?} has no geometry", place.name);
            self.state = self.state.failed(ViewError::Search);
            return None;
        };

        match geometry.viewport {
            Some(viewport) => self.map.fit_bounds(viewport),
            None => self.map.set_center(geometry.location),
        }

        let bounds = region_bounds(&self.map, &self.config, geometry.location);
        self.map.set_rectangle_bounds(bounds);
        self.map.set_zoom(self.config.zoom);

        self.on_region_changed()
    }
}

/// Popup HTML for a record: title, line break, month and street.
#[must_use]
pub fn popup_content(record: &CrimeRecord) -> String {
    format!(
        "{}<br />{} {}",
        record.title(),
        record.month,
        record.street_name()
    )
}

const fn record_position(record: &CrimeRecord) -> LatLng {
    LatLng::new(record.location.latitude, record.location.longitude)
}

fn region_bounds<M: MapWidget>(map: &M, config: &ViewConfig, center: LatLng) -> LatLngBounds {
    make_bounds(
        center,
        config.region_width_m,
        config.region_height_m,
        |from, distance, heading| map.compute_offset(from, distance, heading),
    )
}
