//! Chat bot factories.
//!
//! A factory turns user input into a bot by calling one or more remote
//! services:
//! - [`GeocodeBotFactory`]: place name -> [`PlaceResult`](crate::models::PlaceResult)
//! - [`GeoWikiBotFactory`]: coordinates -> [`ExtractResult`](crate::models::ExtractResult)
//! - [`GrandPyBot`]: both, chained

mod geocode;
mod geowiki;
mod grandpy;

use async_trait::async_trait;

use crate::errors::Result;

pub use geocode::{parse_place, GeocodeBotFactory};
pub use geowiki::{choose_candidate, parse_extract, parse_geosearch, GeoWikiBotFactory};
pub use grandpy::{Answer, GrandPyBot};

/// Shared calling convention of the factories.
#[async_trait]
pub trait ChatBotFactory: Send + Sync {
    /// User input consumed by a build.
    type Params: Send + 'static;
    /// The bot produced.
    type Bot: Send;

    /// Calls the remote services and builds the bot.
    async fn build(&self, params: Self::Params) -> Result<Self::Bot>;

    /// Returns a freshly built bot. Nothing is cached: every call hits the
    /// network again.
    async fn get_object(&self, params: Self::Params) -> Result<Self::Bot> {
        self.build(params).await
    }
}
