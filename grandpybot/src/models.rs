//! Data models: factory inputs, built bots, and the raw response shapes of
//! the geocoding and encyclopedia services.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::errors::{ChatBotError, Result};

/// Free-text place search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    query: String,
}

impl SearchRequest {
    /// Creates a search request. The text is sent as-is (percent-encoded).
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// The query text.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl From<&str> for SearchRequest {
    fn from(query: &str) -> Self {
        Self::new(query)
    }
}

impl From<String> for SearchRequest {
    fn from(query: String) -> Self {
        Self::new(query)
    }
}

/// A coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Formats as `lat|lon`, the geosearch `gscoord` syntax.
impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.latitude, self.longitude)
    }
}

/// Geocoding bot: a canonical place name and its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceResult {
    /// Canonical display name returned by the geocoder.
    pub display_name: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl PlaceResult {
    /// Creates a place result.
    #[must_use]
    pub fn new(display_name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            display_name: display_name.into(),
            latitude,
            longitude,
        }
    }

    /// The coordinates of this place.
    #[must_use]
    pub const fn geo_point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Encyclopedia bot: a short extract about a nearby page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractResult {
    /// The extract, exactly as returned by the service.
    pub extract: String,
}

impl ExtractResult {
    /// Creates an extract result.
    #[must_use]
    pub fn new(extract: impl Into<String>) -> Self {
        Self {
            extract: extract.into(),
        }
    }
}

/// A nearby page returned by geosearch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageCandidate {
    /// Encyclopedia page id.
    pub page_id: u64,
}

// Wire types

/// A coordinate the geocoder may send as a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    /// Numeric form.
    Number(f64),
    /// Textual form, e.g. `"48.8566969"`.
    Text(String),
}

impl Coordinate {
    /// Converts to degrees.
    pub fn to_degrees(&self, field: &str) -> Result<f64> {
        match self {
            Self::Number(value) => Ok(*value),
            Self::Text(text) => text.trim().parse::<f64>().map_err(|_| {
                ChatBotError::malformed(format!("`{field}` is not a number: {text:?}"))
            }),
        }
    }
}

/// One element of the geocoding response array.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodePlace {
    /// Canonical name.
    pub display_name: String,
    /// Latitude.
    pub lat: Coordinate,
    /// Longitude.
    pub lon: Coordinate,
}

/// Geosearch response. Both levels are optional: a missing key means no
/// candidates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoSearchResponse {
    /// The `query` object.
    #[serde(default)]
    pub query: Option<GeoSearchQuery>,
}

/// The `query` object of a geosearch response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeoSearchQuery {
    /// Nearby pages.
    #[serde(default)]
    pub geosearch: Option<Vec<GeoSearchPage>>,
}

/// A page in the geosearch list.
#[derive(Debug, Clone, Deserialize)]
pub struct GeoSearchPage {
    /// Page id.
    pub pageid: u64,
    /// Page title.
    #[serde(default)]
    pub title: Option<String>,
    /// Distance from the point in meters.
    #[serde(default)]
    pub dist: Option<f64>,
}

impl GeoSearchResponse {
    /// Page ids in response order; empty when `query` or `geosearch` is absent.
    #[must_use]
    pub fn candidates(&self) -> Vec<PageCandidate> {
        self.query
            .as_ref()
            .and_then(|q| q.geosearch.as_ref())
            .map(|pages| {
                pages
                    .iter()
                    .map(|page| PageCandidate {
                        page_id: page.pageid,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Page-extract response.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractResponse {
    /// The `query` object.
    pub query: ExtractQuery,
}

/// The `query` object of an extract response.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractQuery {
    /// Pages keyed by their id as a string.
    pub pages: HashMap<String, ExtractPage>,
}

/// A page of an extract response.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractPage {
    /// The extract. Absent for missing or invalid pages.
    #[serde(default)]
    pub extract: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_geo_point_display() {
        assert_eq!(GeoPoint::new(48.85, 2.35).to_string(), "48.85|2.35");
        assert_eq!(GeoPoint::new(-33.0, 151.5).to_string(), "-33|151.5");
    }

    #[test]
    fn test_coordinate_forms() {
        let text: Coordinate = serde_json::from_str(r#""48.85""#).unwrap();
        let number: Coordinate = serde_json::from_str("2.35").unwrap();
        assert_eq!(text.to_degrees("lat").unwrap(), 48.85);
        assert_eq!(number.to_degrees("lon").unwrap(), 2.35);

        let bad = Coordinate::Text("north".to_string());
        assert!(bad.to_degrees("lat").is_err());
    }

    #[test]
    fn test_candidates_missing_keys() {
        let none: GeoSearchResponse = serde_json::from_str("{}").unwrap();
        assert!(none.candidates().is_empty());

        let no_list: GeoSearchResponse =
            serde_json::from_str(r#"{"batchcomplete": "", "query": {}}"#).unwrap();
        assert!(no_list.candidates().is_empty());
    }

    #[test]
    fn test_candidates_keep_order() {
        let response: GeoSearchResponse = serde_json::from_str(
            r#"{"query": {"geosearch": [
                {"pageid": 7, "title": "A", "dist": 12.5},
                {"pageid": 3},
                {"pageid": 9}
            ]}}"#,
        )
        .unwrap();
        let ids: Vec<u64> = response.candidates().iter().map(|c| c.page_id).collect();
        assert_eq!(ids, vec![7, 3, 9]);
    }

    #[test]
    fn test_place_geo_point() {
        let place = PlaceResult::new("Paris", 48.85, 2.35);
        assert_eq!(place.geo_point(), GeoPoint::new(48.85, 2.35));
    }
}
