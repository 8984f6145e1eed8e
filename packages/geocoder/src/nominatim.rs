//! Nominatim / `OpenStreetMap` place search client.
//!
//! Nominatim has strict rate limits: **1 request per second** maximum on the
//! public instance. Place search is user-driven (one request per search
//! submission), so no client-side limiter is applied.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use async_trait::async_trait;
use crime_region_geography_models::{LatLng, LatLngBounds, Place, PlaceGeometry};

use crate::service_registry::SearchService;
use crate::{GeocodeError, PlaceSearch};

/// A [`PlaceSearch`] backed by Nominatim free-form search.
#[derive(Debug, Clone)]
pub struct NominatimSearch {
    client: reqwest::Client,
    service: SearchService,
}

impl NominatimSearch {
    /// Creates a search client for `service`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the HTTP client cannot be built.
    pub fn new(service: SearchService) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .user_agent(service.user_agent.clone())
            .build()?;
        Ok(Self { client, service })
    }
}

#[async_trait]
impl PlaceSearch for NominatimSearch {
    async fn search(&self, query: &str) -> Result<Option<Place>, GeocodeError> {
        let mut params = vec![("q", query), ("format", "jsonv2"), ("limit", "1")];
        if let Some(codes) = self.service.country_codes.as_deref() {
            params.push(("countrycodes", codes));
        }

        log::debug!("Searching {} for {query:?}", self.service.id);
        let resp = self
            .client
            .get(&self.service.base_url)
            .query(&params)
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited);
        }

        let body: serde_json::Value = resp.error_for_status()?.json().await?;
        parse_response(&body)
    }
}

/// Parses a Nominatim JSON response.
///
/// An empty result list is `None`. A result whose coordinates are missing
/// or unreadable becomes a [`Place`] without geometry.
fn parse_response(body: &serde_json::Value) -> Result<Option<Place>, GeocodeError> {
    let results = body.as_array().ok_or_else(|| GeocodeError::Parse {
        message: "Nominatim response is not an array".to_string(),
    })?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    let name = first["display_name"].as_str().map(String::from);
    let lat = parse_coordinate(&first["lat"]);
    let lon = parse_coordinate(&first["lon"]);

    let geometry = match (lat, lon) {
        (Some(lat), Some(lon)) => Some(PlaceGeometry {
            location: LatLng::new(lat, lon),
            viewport: parse_bounding_box(&first["boundingbox"]),
        }),
        _ => {
            log::debug!("Nominatim result {name:?} has no usable coordinates");
            None
        }
    };

    Ok(Some(Place { name, geometry }))
}

/// Parses `boundingbox`, which Nominatim orders `[south, north, west, east]`.
fn parse_bounding_box(value: &serde_json::Value) -> Option<LatLngBounds> {
    let parts: Vec<f64> = value
        .as_array()?
        .iter()
        .map(parse_coordinate)
        .collect::<Option<_>>()?;
    let [south, north, west, east] = parts.as_slice() else {
        return None;
    };
    Some(LatLngBounds::new(
        LatLng::new(*south, *west),
        LatLng::new(*north, *east),
    ))
}

fn parse_coordinate(value: &serde_json::Value) -> Option<f64> {
    value
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| value.as_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nominatim_result() {
        let body = serde_json::json!([{
            "lat": "51.5306",
            "lon": "-0.1239",
            "display_name": "King's Cross, London Borough of Camden, London, England",
            "boundingbox": ["51.5206", "51.5406", "-0.1339", "-0.1139"]
        }]);
        let place = parse_response(&body).unwrap().unwrap();
        let geometry = place.geometry.unwrap();
        assert!((geometry.location.lat - 51.5306).abs() < 1e-4);
        assert!((geometry.location.lng - -0.1239).abs() < 1e-4);

        let viewport = geometry.viewport.unwrap();
        assert!((viewport.south_west.lat - 51.5206).abs() < 1e-9);
        assert!((viewport.south_west.lng - -0.1339).abs() < 1e-9);
        assert!((viewport.north_east.lat - 51.5406).abs() < 1e-9);
        assert!((viewport.north_east.lng - -0.1139).abs() < 1e-9);
        assert!(place.name.unwrap().starts_with("King's Cross"));
    }

    #[test]
    fn parses_nominatim_empty() {
        let body = serde_json::json!([]);
        assert!(parse_response(&body).unwrap().is_none());
    }

    #[test]
    fn missing_coordinates_yield_place_without_geometry() {
        let body = serde_json::json!([{ "display_name": "Somewhere" }]);
        let place = parse_response(&body).unwrap().unwrap();
        assert!(place.geometry.is_none());
        assert_eq!(place.name.as_deref(), Some("Somewhere"));
    }

    #[test]
    fn malformed_bounding_box_is_dropped() {
        let body = serde_json::json!([{
            "lat": "51.5",
            "lon": "-0.12",
            "boundingbox": ["51.4", "51.6"]
        }]);
        let place = parse_response(&body).unwrap().unwrap();
        assert!(place.geometry.unwrap().viewport.is_none());
    }

    #[test]
    fn non_array_is_a_parse_error() {
        let body = serde_json::json!({ "error": "bad request" });
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }
}
