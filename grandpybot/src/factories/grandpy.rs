//! Geocoding followed by a nearby encyclopedia extract.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::{ChatBotFactory, GeoWikiBotFactory, GeocodeBotFactory};
use crate::config::ChatBotConfig;
use crate::errors::Result;
use crate::http::{JsonFetcher, ReqwestFetcher};
use crate::models::{ExtractResult, PlaceResult, SearchRequest};
use crate::random::IndexPicker;

/// Both bots built for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Where the place is.
    pub place: PlaceResult,
    /// Something about its surroundings.
    pub story: ExtractResult,
}

/// Runs the geocoding factory, then the encyclopedia factory on the place
/// found.
#[derive(Debug, Clone)]
pub struct GrandPyBot {
    geocode: GeocodeBotFactory,
    geowiki: GeoWikiBotFactory,
}

impl GrandPyBot {
    /// Creates the bot; both factories share one fetcher.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: ChatBotConfig) -> Self {
        Self {
            geocode: GeocodeBotFactory::new(fetcher.clone(), config.clone()),
            geowiki: GeoWikiBotFactory::new(fetcher, config),
        }
    }

    /// Creates a bot that talks to the network.
    pub fn from_config(config: ChatBotConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = ReqwestFetcher::new(&config.http)?;
        Ok(Self::new(Arc::new(fetcher), config))
    }

    /// Replaces the source of randomness of the encyclopedia step.
    #[must_use]
    pub fn with_picker(mut self, picker: Arc<dyn IndexPicker>) -> Self {
        self.geowiki = self.geowiki.with_picker(picker);
        self
    }

    /// Geocodes `query` and tells something about the area.
    pub async fn answer(&self, query: impl Into<SearchRequest> + Send) -> Result<Answer> {
        let place = self.geocode.build(query.into()).await?;
        let story = self.geowiki.build(place.geo_point()).await?;
        info!(place = %place.display_name, "Answer ready");
        Ok(Answer { place, story })
    }
}
