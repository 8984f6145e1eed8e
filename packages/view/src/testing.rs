//! In-memory map widget and data sources for tests.

use std::collections::{BTreeSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use crime_region_crime_models::{CrimeLocation, CrimeRecord, Street, YearMonth};
use crime_region_geography_models::{LatLng, LatLngBounds, PolygonQuery};
use crime_region_source::{CrimeDataSource, SourceError};
use tokio::sync::oneshot;

use crate::map::MapWidget;

/// A record of one call the view made on the map.
#[derive(Debug, Clone, PartialEq)]
pub enum MapOp {
    SetCenter(LatLng),
    SetZoom(u8),
    FitBounds(LatLngBounds),
    CreateRectangle(LatLngBounds),
    SetRectangle(LatLngBounds),
    Add(u32),
    Remove(u32),
    OpenPopup(u32),
}

#[derive(Debug, Default)]
pub struct MockMap {
    pub center: Option<LatLng>,
    pub zoom: Option<u8>,
    pub fitted: Option<LatLngBounds>,
    pub rectangle: Option<LatLngBounds>,
    pub rectangle_draggable: bool,
    pub popup: Option<(String, u32)>,
    pub ops: Vec<MapOp>,
    pub added: Vec<(u32, LatLng, String)>,
    pub removed: Vec<u32>,
    pub peak_visible: usize,
    visible: BTreeSet<u32>,
    next_id: u32,
}

impl MockMap {
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn is_visible(&self, handle: u32) -> bool {
        self.visible.contains(&handle)
    }

    /// Simulates the user dragging the rectangle.
    pub fn drag_to(&mut self, bounds: LatLngBounds) {
        self.rectangle = Some(bounds);
    }

    pub fn reset_peak(&mut self) {
        self.peak_visible = 0;
    }
}

impl MapWidget for MockMap {
    type Marker = u32;

    fn set_center(&mut self, center: LatLng) {
        self.center = Some(center);
        self.ops.push(MapOp::SetCenter(center));
    }

    fn set_zoom(&mut self, zoom: u8) {
        self.zoom = Some(zoom);
        self.ops.push(MapOp::SetZoom(zoom));
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        self.fitted = Some(bounds);
        self.ops.push(MapOp::FitBounds(bounds));
    }

    fn create_rectangle(&mut self, bounds: LatLngBounds, draggable: bool) {
        self.rectangle = Some(bounds);
        self.rectangle_draggable = draggable;
        self.ops.push(MapOp::CreateRectangle(bounds));
    }

    fn rectangle_bounds(&self) -> Option<LatLngBounds> {
        self.rectangle
    }

    fn set_rectangle_bounds(&mut self, bounds: LatLngBounds) {
        self.rectangle = Some(bounds);
        self.ops.push(MapOp::SetRectangle(bounds));
    }

    fn add_marker(&mut self, position: LatLng, title: &str) -> u32 {
        self.next_id += 1;
        let id = self.next_id;
        self.visible.insert(id);
        self.peak_visible = self.peak_visible.max(self.visible.len());
        self.added.push((id, position, title.to_string()));
        self.ops.push(MapOp::Add(id));
        id
    }

    fn remove_marker(&mut self, marker: &u32) {
        self.visible.remove(marker);
        self.removed.push(*marker);
        self.ops.push(MapOp::Remove(*marker));
    }

    fn open_popup(&mut self, content: &str, anchor: &u32) {
        self.popup = Some((content.to_string(), *anchor));
        self.ops.push(MapOp::OpenPopup(*anchor));
    }
}

pub fn record_at(category: &str, street: &str, latitude: f64, longitude: f64) -> CrimeRecord {
    CrimeRecord {
        category: category.to_string(),
        month: "2017-09".to_string(),
        location: CrimeLocation {
            latitude,
            longitude,
            street: Street {
                id: None,
                name: street.to_string(),
            },
        },
        id: None,
        persistent_id: None,
        location_type: None,
        location_subtype: None,
        context: None,
        outcome_status: None,
    }
}

pub fn record(category: &str, street: &str) -> CrimeRecord {
    record_at(category, street, 51.5203, -0.1202)
}

/// Answers every query with the same records.
pub struct StaticSource {
    records: Vec<CrimeRecord>,
    requests: Mutex<Vec<(PolygonQuery, YearMonth)>>,
}

impl StaticSource {
    pub fn new(records: Vec<CrimeRecord>) -> Self {
        Self {
            records,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(PolygonQuery, YearMonth)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CrimeDataSource for StaticSource {
    fn id(&self) -> &str {
        "static"
    }

    async fn fetch_crimes(
        &self,
        polygon: &PolygonQuery,
        month: YearMonth,
    ) -> Result<Vec<CrimeRecord>, SourceError> {
        self.requests.lock().unwrap().push((polygon.clone(), month));
        Ok(self.records.clone())
    }
}

pub type Reply = Result<Vec<CrimeRecord>, SourceError>;

/// Each query waits for a reply sent by the test, in issue order.
#[derive(Default)]
pub struct ScriptedSource {
    replies: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
}

impl ScriptedSource {
    /// Queues a reply slot for the next query and returns its sender.
    pub fn expect_query(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(rx);
        tx
    }
}

#[async_trait]
impl CrimeDataSource for ScriptedSource {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn fetch_crimes(
        &self,
        _polygon: &PolygonQuery,
        _month: YearMonth,
    ) -> Result<Vec<CrimeRecord>, SourceError> {
        let rx = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected query");
        rx.await.expect("reply sender dropped")
    }
}
