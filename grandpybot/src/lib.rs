//! # GrandPy Bot
//!
//! Chat bot factories backed by public web APIs.
//!
//! - **Geocoding**: a free-text place name becomes a [`PlaceResult`](models::PlaceResult)
//!   with its canonical name and coordinates.
//! - **Encyclopedia**: a coordinate pair becomes an [`ExtractResult`](models::ExtractResult),
//!   a short extract about a page picked at random among the nearby ones.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grandpybot::prelude::*;
//!
//! # async fn run() -> Result<(), ChatBotError> {
//! let bot = GrandPyBot::from_config(ChatBotConfig::default())?;
//! let answer = bot.answer("Tour Eiffel").await?;
//! println!("{} -> {}", answer.place.display_name, answer.story.extract);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod errors;
pub mod factories;
pub mod http;
pub mod models;
pub mod observability;
pub mod random;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ChatBotConfig, HttpConfig, RetryConfig};
    pub use crate::errors::{ChatBotError, ErrorKind};
    pub use crate::factories::{
        Answer, ChatBotFactory, GeoWikiBotFactory, GeocodeBotFactory, GrandPyBot,
    };
    pub use crate::http::{ApiRequest, JsonFetcher, ReqwestFetcher};
    pub use crate::models::{ExtractResult, GeoPoint, PlaceResult, SearchRequest};
    pub use crate::observability::{init_tracing, LogFormat};
    pub use crate::random::{IndexPicker, SeededPicker, ThreadRngPicker};
}
