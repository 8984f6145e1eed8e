//! Street-level crimes client for the data.police.uk API.
//!
//! See <https://data.police.uk/docs/method/crime-street/>. The endpoint
//! takes a custom polygon (`poly`, `lat,lng` pairs joined by `:`) and a
//! month (`date`, `YYYY-MM`) and answers with a JSON array of crimes.
//! It responds with HTTP 503 when the polygon holds more than 10,000
//! crimes, which surfaces here as [`SourceError::Status`].

use async_trait::async_trait;
use crime_region_crime_models::{CrimeRecord, YearMonth};
use crime_region_geography_models::PolygonQuery;

use crate::source_def::SourceDefinition;
use crate::{CrimeDataSource, SourceError};

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// A [`CrimeDataSource`] backed by one HTTP GET per query.
#[derive(Debug, Clone)]
pub struct PoliceUkSource {
    client: reqwest::Client,
    definition: SourceDefinition,
}

impl PoliceUkSource {
    /// Creates a client for the given source definition.
    #[must_use]
    pub const fn new(client: reqwest::Client, definition: SourceDefinition) -> Self {
        Self { client, definition }
    }

    /// Builds the request URL with `poly` and `date` percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidUrl`] if the configured base URL does
    /// not parse.
    pub fn request_url(
        &self,
        polygon: &PolygonQuery,
        month: YearMonth,
    ) -> Result<reqwest::Url, SourceError> {
        let date = month.to_string();
        reqwest::Url::parse_with_params(
            &self.definition.base_url,
            &[("poly", polygon.as_str()), ("date", date.as_str())],
        )
        .map_err(|e| SourceError::InvalidUrl {
            url: self.definition.base_url.clone(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl CrimeDataSource for PoliceUkSource {
    fn id(&self) -> &str {
        &self.definition.id
    }

    async fn fetch_crimes(
        &self,
        polygon: &PolygonQuery,
        month: YearMonth,
    ) -> Result<Vec<CrimeRecord>, SourceError> {
        let url = self.request_url(polygon, month)?;
        log::debug!("GET {url}");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("{} answered HTTP {status} for {url}", self.definition.id);
            return Err(SourceError::Status {
                status,
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        let records = parse_body(&text).inspect_err(|e| {
            log::warn!(
                "Unparseable response from {}\n  \
                 url: {url}\n  \
                 received: {} bytes\n  \
                 parse error: {e}\n  \
                 body preview: {}",
                self.definition.id,
                text.len(),
                preview(&text),
            );
        })?;

        log::info!(
            "{} returned {} crimes for {month}",
            self.definition.id,
            records.len()
        );
        Ok(records)
    }
}

/// Parses a response body into crime records.
///
/// # Errors
///
/// Returns [`SourceError::Json`] if the body is not a JSON array of crime
/// record objects.
pub fn parse_body(text: &str) -> Result<Vec<CrimeRecord>, SourceError> {
    Ok(serde_json::from_str(text)?)
}

fn preview(text: &str) -> &str {
    if text.len() <= BODY_PREVIEW_LEN {
        return text;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::default_source;
    use crime_region_geography_models::{LatLng, LatLngBounds, Region};

    fn source() -> PoliceUkSource {
        PoliceUkSource::new(reqwest::Client::new(), default_source())
    }

    #[test]
    fn request_url_percent_encodes_poly_and_date() {
        let region = Region::new(LatLngBounds::new(
            LatLng::new(51.5, -0.13),
            LatLng::new(51.53, -0.11),
        ));
        let month: YearMonth = "2017-09".parse().unwrap();

        let url = source().request_url(&region.polygon_query(), month).unwrap();

        assert_eq!(
            url.as_str(),
            "https://data.police.uk/api/crimes-street/all-crime\
             ?poly=51.53%2C-0.13%3A51.53%2C-0.11%3A51.5%2C-0.11%3A51.5%2C-0.13\
             &date=2017-09"
        );
    }

    #[test]
    fn request_url_rejects_bad_base() {
        let mut def = default_source();
        def.base_url = "not a url".to_string();
        let source = PoliceUkSource::new(reqwest::Client::new(), def);
        let region = Region::new(LatLngBounds::new(
            LatLng::new(0.0, 0.0),
            LatLng::new(1.0, 1.0),
        ));

        let err = source
            .request_url(&region.polygon_query(), YearMonth::default())
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidUrl { .. }));
    }

    #[test]
    fn parses_empty_and_populated_bodies() {
        assert!(parse_body("[]").unwrap().is_empty());

        let body = r#"[{
            "category": "burglary",
            "month": "2017-09",
            "location": {
                "latitude": "51.519",
                "longitude": "-0.121",
                "street": { "id": 1, "name": "On or near Red Lion Street" }
            }
        }]"#;
        let records = parse_body(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].street_name(), "On or near Red Lion Street");
    }

    #[test]
    fn non_json_body_is_an_error() {
        let err = parse_body("<html>Service Unavailable</html>").unwrap_err();
        assert!(matches!(err, SourceError::Json(_)));
        assert!(matches!(parse_body("{}"), Err(SourceError::Json(_))));
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let long = "é".repeat(BODY_PREVIEW_LEN);
        let cut = preview(&long);
        assert!(cut.len() <= BODY_PREVIEW_LEN);
        assert!(long.starts_with(cut));
        assert_eq!(preview("short"), "short");
    }
}
