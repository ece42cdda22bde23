//! Geocoding bot factory.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::ChatBotFactory;
use crate::config::ChatBotConfig;
use crate::errors::{ChatBotError, Result};
use crate::http::{ApiRequest, JsonFetcher, ReqwestFetcher};
use crate::models::{GeocodePlace, PlaceResult, SearchRequest};

/// Builds a [`PlaceResult`] from a free-text place name.
#[derive(Clone)]
pub struct GeocodeBotFactory {
    fetcher: Arc<dyn JsonFetcher>,
    config: ChatBotConfig,
}

impl std::fmt::Debug for GeocodeBotFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeBotFactory")
            .field("geocode_url", &self.config.geocode_url)
            .finish_non_exhaustive()
    }
}

impl GeocodeBotFactory {
    /// Creates a factory using the given fetcher.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: ChatBotConfig) -> Self {
        Self { fetcher, config }
    }

    /// Creates a factory that talks to the network.
    pub fn from_config(config: ChatBotConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = ReqwestFetcher::new(&config.http)?;
        Ok(Self::new(Arc::new(fetcher), config))
    }

    /// The geocoding request for a search.
    #[must_use]
    pub fn request(&self, search: &SearchRequest) -> ApiRequest {
        ApiRequest::get(&self.config.geocode_url)
            .param("q", search.query())
            .param("addressdetails", 1)
            .param("countrycodes", &self.config.country_codes)
            .param("limit", self.config.geocode_limit)
            .param("format", "json")
    }

    /// Shorthand for `build(SearchRequest::new(query))`.
    pub async fn geocode(&self, query: &str) -> Result<PlaceResult> {
        self.build(SearchRequest::new(query)).await
    }
}

#[async_trait]
impl ChatBotFactory for GeocodeBotFactory {
    type Params = SearchRequest;
    type Bot = PlaceResult;

    async fn build(&self, search: SearchRequest) -> Result<PlaceResult> {
        info!(query = search.query(), "Geocoding place");
        let request = self.request(&search);
        let response = self.fetcher.get_json(&request).await?;
        let place = parse_place(&response)?;
        debug!(
            display_name = %place.display_name,
            latitude = place.latitude,
            longitude = place.longitude,
            "Place found"
        );
        Ok(place)
    }
}

/// Builds a [`PlaceResult`] from the first element of a geocoding response.
pub fn parse_place(response: &serde_json::Value) -> Result<PlaceResult> {
    let places = response
        .as_array()
        .ok_or_else(|| ChatBotError::malformed("geocoding response is not an array"))?;
    let first = places
        .first()
        .ok_or_else(|| ChatBotError::empty("geocoding returned no place"))?;
    let place = GeocodePlace::deserialize(first)?;

    Ok(PlaceResult::new(
        place.display_name,
        place.lat.to_degrees("lat")?,
        place.lon.to_degrees("lon")?,
    ))
}
