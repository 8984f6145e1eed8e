#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map geometry types for region selection.
//!
//! A [`Region`] is the rectangle the user drags over the map. Its four
//! [`Corners`] are encoded as a [`PolygonQuery`] for the crime data API,
//! which reads the corner list as a polygon boundary, so the corner order
//! matters. [`compute_offset`] and [`make_bounds`] synthesize a region of a
//! given size in metres around a point.

use geo::{Intersects, LineString, Point, Polygon};
use serde::{Deserialize, Serialize};

/// Mean equatorial radius used by web map spherical geometry, in metres.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// A WGS84 latitude/longitude pair, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl LatLng {
    /// Creates a new point.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for LatLng {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl From<LatLng> for Point<f64> {
    fn from(p: LatLng) -> Self {
        Self::new(p.lng, p.lat)
    }
}

/// An axis-aligned lat/lng rectangle given by two opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLngBounds {
    /// South-west corner.
    pub south_west: LatLng,
    /// North-east corner.
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Creates bounds from the south-west and north-east corners.
    #[must_use]
    pub const fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Midpoint of the bounds.
    #[must_use]
    pub fn center(&self) -> LatLng {
        LatLng::new(
            f64::midpoint(self.south_west.lat, self.north_east.lat),
            f64::midpoint(self.south_west.lng, self.north_east.lng),
        )
    }
}

/// The four corners of a region, in polygon order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corners {
    /// North-west corner.
    pub north_west: LatLng,
    /// North-east corner.
    pub north_east: LatLng,
    /// South-east corner.
    pub south_east: LatLng,
    /// South-west corner.
    pub south_west: LatLng,
}

impl Corners {
    /// Corners in the order the crime API expects: NW, NE, SE, SW.
    #[must_use]
    pub const fn in_order(&self) -> [LatLng; 4] {
        [
            self.north_west,
            self.north_east,
            self.south_east,
            self.south_west,
        ]
    }
}

/// A user-selected rectangular region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    bounds: LatLngBounds,
}

impl Region {
    /// Wraps the current rectangle bounds.
    #[must_use]
    pub const fn new(bounds: LatLngBounds) -> Self {
        Self { bounds }
    }

    /// The bounds this region was built from.
    #[must_use]
    pub const fn bounds(&self) -> LatLngBounds {
        self.bounds
    }

    /// Derives the four corners from the bounds.
    ///
    /// NW takes the north latitude of NE with the longitude of SW, and SE
    /// takes the south latitude of SW with the longitude of NE.
    #[must_use]
    pub const fn corners(&self) -> Corners {
        let ne = self.bounds.north_east;
        let sw = self.bounds.south_west;
        Corners {
            north_west: LatLng::new(ne.lat, sw.lng),
            north_east: ne,
            south_east: LatLng::new(sw.lat, ne.lng),
            south_west: sw,
        }
    }

    /// Encodes the corners for the crime API.
    #[must_use]
    pub fn polygon_query(&self) -> PolygonQuery {
        PolygonQuery::from_corners(&self.corners())
    }

    /// The region as a closed `geo` polygon (x = longitude, y = latitude).
    #[must_use]
    pub fn to_polygon(&self) -> Polygon<f64> {
        let ring: Vec<(f64, f64)> = self
            .corners()
            .in_order()
            .iter()
            .map(|p| (p.lng, p.lat))
            .collect();
        Polygon::new(LineString::from(ring), vec![])
    }

    /// Whether `point` lies inside or on the edge of the region.
    #[must_use]
    pub fn contains(&self, point: LatLng) -> bool {
        self.to_polygon().intersects(&Point::from(point))
    }
}

/// The `poly` query parameter: `lat,lng` corner strings joined by `:`.
///
/// Coordinates use Rust's shortest round-trip `f64` formatting, so a
/// negative zero prints as `-0` and tiny values print in positional form
/// (`0.0000001`, never `1e-7`). The API parses both the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolygonQuery(String);

/// Separator between corners in a [`PolygonQuery`].
pub const POLYGON_DELIMITER: char = ':';

impl PolygonQuery {
    /// Encodes corners in NW, NE, SE, SW order.
    #[must_use]
    pub fn from_corners(corners: &Corners) -> Self {
        let parts: Vec<String> = corners
            .in_order()
            .iter()
            .map(ToString::to_string)
            .collect();
        Self(parts.join(&POLYGON_DELIMITER.to_string()))
    }

    /// The raw, unencoded parameter value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PolygonQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved place-search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Display name of the place, if the provider returned one.
    pub name: Option<String>,
    /// Where the place is. `None` when the provider could not resolve it.
    pub geometry: Option<PlaceGeometry>,
}

/// Location data of a resolved place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaceGeometry {
    /// The place's representative point.
    pub location: LatLng,
    /// Recommended viewport for showing the place, if known.
    pub viewport: Option<LatLngBounds>,
}

/// Returns the point `distance_m` metres from `from` along `heading_deg`
/// (degrees clockwise from north), on a sphere of radius
/// [`EARTH_RADIUS_M`].
#[must_use]
pub fn compute_offset(from: LatLng, distance_m: f64, heading_deg: f64) -> LatLng {
    let distance = distance_m / EARTH_RADIUS_M;
    let heading = heading_deg.to_radians();
    let from_lat = from.lat.to_radians();
    let from_lng = from.lng.to_radians();

    let (sin_distance, cos_distance) = distance.sin_cos();
    let (sin_from_lat, cos_from_lat) = from_lat.sin_cos();
    let sin_lat = cos_distance.mul_add(
        sin_from_lat,
        sin_distance * cos_from_lat * heading.cos(),
    );
    let d_lng = (sin_distance * cos_from_lat * heading.sin())
        .atan2(sin_from_lat.mul_add(-sin_lat, cos_distance));

    LatLng::new(
        sin_lat.asin().to_degrees(),
        wrap_longitude((from_lng + d_lng).to_degrees()),
    )
}

/// Builds bounds `width_m` wide and `height_m` tall centred on `center`,
/// using `offset` for the spherical steps.
///
/// North and south edges are found first, then the corners are offset
/// east from the north edge and west from the south edge.
pub fn make_bounds<F>(center: LatLng, width_m: f64, height_m: f64, offset: F) -> LatLngBounds
where
    F: Fn(LatLng, f64, f64) -> LatLng,
{
    let north = offset(center, height_m / 2.0, 0.0);
    let south = offset(center, height_m / 2.0, 180.0);
    let north_east = offset(north, width_m / 2.0, 90.0);
    let south_west = offset(south, width_m / 2.0, -90.0);
    LatLngBounds::new(south_west, north_east)
}

fn wrap_longitude(lng: f64) -> f64 {
    if (-180.0..180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}
