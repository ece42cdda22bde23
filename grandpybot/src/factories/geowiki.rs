//! Encyclopedia bot factory: nearby pages around a point, one picked at
//! random, summarized by its extract.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use super::ChatBotFactory;
use crate::config::ChatBotConfig;
use crate::errors::{ChatBotError, Result};
use crate::http::{ApiRequest, JsonFetcher, ReqwestFetcher};
use crate::models::{ExtractResponse, ExtractResult, GeoPoint, GeoSearchResponse, PageCandidate};
use crate::random::{IndexPicker, ThreadRngPicker};

/// Builds an [`ExtractResult`] about a page near a [`GeoPoint`].
///
/// Two builds with the same point may return different extracts.
#[derive(Clone)]
pub struct GeoWikiBotFactory {
    fetcher: Arc<dyn JsonFetcher>,
    picker: Arc<dyn IndexPicker>,
    config: ChatBotConfig,
}

impl std::fmt::Debug for GeoWikiBotFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoWikiBotFactory")
            .field("wiki_api_url", &self.config.wiki_api_url)
            .field("radius", &self.config.geosearch_radius_meters)
            .finish_non_exhaustive()
    }
}

impl GeoWikiBotFactory {
    /// Creates a factory using the given fetcher and the thread-local RNG.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: ChatBotConfig) -> Self {
        Self {
            fetcher,
            picker: Arc::new(ThreadRngPicker),
            config,
        }
    }

    /// Creates a factory that talks to the network.
    pub fn from_config(config: ChatBotConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = ReqwestFetcher::new(&config.http)?;
        Ok(Self::new(Arc::new(fetcher), config))
    }

    /// Replaces the source of randomness.
    #[must_use]
    pub fn with_picker(mut self, picker: Arc<dyn IndexPicker>) -> Self {
        self.picker = picker;
        self
    }

    /// The geosearch request around a point.
    #[must_use]
    pub fn geosearch_request(&self, point: GeoPoint) -> ApiRequest {
        ApiRequest::get(&self.config.wiki_api_url)
            .param("action", "query")
            .param("list", "geosearch")
            .param("gscoord", point)
            .param("gsradius", self.config.geosearch_radius_meters)
            .param("gslimit", self.config.geosearch_limit)
            .param("format", "json")
    }

    /// The extract request for one page.
    #[must_use]
    pub fn extract_request(&self, candidate: PageCandidate) -> ApiRequest {
        ApiRequest::get(&self.config.wiki_api_url)
            .param("action", "query")
            .param("prop", "extracts")
            .param("exsentences", self.config.extract_sentences)
            .param("pageids", candidate.page_id)
            .param("format", "json")
    }

    /// Shorthand for `build(GeoPoint::new(latitude, longitude))`.
    pub async fn describe(&self, latitude: f64, longitude: f64) -> Result<ExtractResult> {
        self.build(GeoPoint::new(latitude, longitude)).await
    }
}

#[async_trait]
impl ChatBotFactory for GeoWikiBotFactory {
    type Params = GeoPoint;
    type Bot = ExtractResult;

    async fn build(&self, point: GeoPoint) -> Result<ExtractResult> {
        info!(latitude = point.latitude, longitude = point.longitude, "Searching nearby pages");
        let response = self.fetcher.get_json(&self.geosearch_request(point)).await?;
        let candidates = parse_geosearch(&response)?;

        let chosen = choose_candidate(&candidates, self.picker.as_ref())?;
        debug!(
            page_id = chosen.page_id,
            candidates = candidates.len(),
            "Page selected"
        );

        let response = self.fetcher.get_json(&self.extract_request(chosen)).await?;
        parse_extract(&response, chosen)
    }
}

/// Collects the page candidates of a geosearch response, in order.
///
/// A response without `query` or `query.geosearch` has no candidates.
pub fn parse_geosearch(response: &serde_json::Value) -> Result<Vec<PageCandidate>> {
    if !response.is_object() {
        return Err(ChatBotError::malformed("geosearch response is not an object"));
    }
    let parsed: GeoSearchResponse = serde_json::from_value(response.clone())?;
    Ok(parsed.candidates())
}

/// Picks one candidate, failing when there is none.
pub fn choose_candidate(
    candidates: &[PageCandidate],
    picker: &dyn IndexPicker,
) -> Result<PageCandidate> {
    if candidates.is_empty() {
        return Err(ChatBotError::empty("no nearby content found"));
    }
    let index = picker.pick(candidates.len());
    candidates.get(index).copied().ok_or_else(|| {
        ChatBotError::configuration(format!(
            "index picker returned {index} for {} candidates",
            candidates.len()
        ))
    })
}

/// Reads `query.pages["<id>"].extract` from an extract response.
pub fn parse_extract(response: &serde_json::Value, candidate: PageCandidate) -> Result<ExtractResult> {
    let parsed: ExtractResponse = serde_json::from_value(response.clone())?;
    let key = candidate.page_id.to_string();
    let page = parsed
        .query
        .pages
        .get(&key)
        .ok_or_else(|| ChatBotError::malformed(format!("page {key} missing from extract response")))?;
    let extract = page
        .extract
        .clone()
        .ok_or_else(|| ChatBotError::malformed(format!("page {key} has no extract")))?;
    Ok(ExtractResult::new(extract))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::random::SeededPicker;
    use crate::testing::{fixtures, FixedPicker, MockFetcher};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn candidates(ids: &[u64]) -> Vec<PageCandidate> {
        ids.iter().map(|&page_id| PageCandidate { page_id }).collect()
    }

    #[tokio::test]
    async fn test_single_candidate() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .respond_when("list", "geosearch", json!({"query": {"geosearch": [{"pageid": 42}]}}))
                .respond_when("pageids", "42", json!({"query": {"pages": {"42": {"extract": "Hello."}}}})),
        );
        let factory = GeoWikiBotFactory::new(fetcher.clone(), ChatBotConfig::default());

        let result = factory.describe(48.85, 2.35).await.unwrap();
        assert_eq!(result, ExtractResult::new("Hello."));

        let requests = fetcher.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].param_value("gscoord"), Some("48.85|2.35"));
        assert_eq!(requests[0].param_value("gsradius"), Some("10000"));
        assert_eq!(requests[0].param_value("gslimit"), Some("10"));
        assert_eq!(requests[1].param_value("prop"), Some("extracts"));
        assert_eq!(requests[1].param_value("exsentences"), Some("3"));
    }

    #[tokio::test]
    async fn test_no_query_key_is_empty_result() {
        let fetcher = Arc::new(MockFetcher::new().respond_when("list", "geosearch", json!({"batchcomplete": ""})));
        let factory = GeoWikiBotFactory::new(fetcher.clone(), ChatBotConfig::default());

        let err = factory.describe(0.0, 0.0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResult);
        // The extract endpoint is never reached.
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_selection_follows_picker() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .respond_when("list", "geosearch", fixtures::geosearch_paris())
                .respond_when("pageids", "681159", fixtures::extract_for(681_159, "Le Louvre."))
                .respond_when("pageids", "1359783", fixtures::extract_for(1_359_783, "Tour Eiffel.")),
        );
        let factory = GeoWikiBotFactory::new(fetcher, ChatBotConfig::default());

        let first = factory
            .clone()
            .with_picker(Arc::new(FixedPicker(0)))
            .describe(48.85, 2.35)
            .await
            .unwrap();
        let second = factory
            .with_picker(Arc::new(FixedPicker(1)))
            .describe(48.85, 2.35)
            .await
            .unwrap();

        assert_eq!(first.extract, "Le Louvre.");
        assert_eq!(second.extract, "Tour Eiffel.");
    }

    #[tokio::test]
    async fn test_seeded_pickers_reach_different_pages() {
        let ids = [11_u64, 22, 33, 44, 55, 66, 77, 88, 99, 110];
        let pages: Vec<_> = ids.iter().map(|id| json!({"pageid": id})).collect();
        let mut fetcher = MockFetcher::new().respond_when("list", "geosearch", json!({"query": {"geosearch": pages}}));
        for id in ids {
            fetcher = fetcher.respond_when("pageids", &id.to_string(), fixtures::extract_for(id, &format!("Page {id}.")));
        }
        let fetcher = Arc::new(fetcher);

        let mut seen = std::collections::HashSet::new();
        for seed in 0..32 {
            let factory = GeoWikiBotFactory::new(fetcher.clone(), ChatBotConfig::default())
                .with_picker(Arc::new(SeededPicker::new(seed)));
            let result = factory.describe(48.85, 2.35).await.unwrap();
            let chosen = fetcher.requests().last().and_then(|r| r.param_value("pageids").map(str::to_string)).unwrap();
            assert_eq!(result.extract, format!("Page {chosen}."));
            seen.insert(chosen);
        }
        assert!(seen.len() > 1);
    }

    #[tokio::test]
    async fn test_missing_extract_is_malformed() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .respond_when("list", "geosearch", json!({"query": {"geosearch": [{"pageid": 5}]}}))
                .respond_when("pageids", "5", json!({"query": {"pages": {"5": {"pageid": 5, "missing": ""}}}})),
        );
        let factory = GeoWikiBotFactory::new(fetcher, ChatBotConfig::default());

        let err = factory.describe(1.0, 1.0).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn test_extract_step_failure_propagates() {
        let fetcher = Arc::new(
            MockFetcher::new()
                .respond_when("list", "geosearch", json!({"query": {"geosearch": [{"pageid": 5}]}}))
                .fail_when("pageids", "5", 500),
        );
        let factory = GeoWikiBotFactory::new(fetcher, ChatBotConfig::default());

        let err = factory.describe(1.0, 1.0).await.unwrap_err();
        assert!(matches!(err, ChatBotError::HttpStatus { status: 500, .. }));
    }

    #[test]
    fn test_choose_candidate() {
        let list = candidates(&[3, 1, 4]);
        assert_eq!(choose_candidate(&list, &FixedPicker(2)).unwrap().page_id, 4);

        let err = choose_candidate(&[], &FixedPicker(0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResult);

        let err = choose_candidate(&list, &FixedPicker(3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_parse_geosearch() {
        let ids: Vec<u64> = parse_geosearch(&fixtures::geosearch_paris())
            .unwrap()
            .into_iter()
            .map(|c| c.page_id)
            .collect();
        assert_eq!(ids, vec![681_159, 1_359_783, 2_785_041]);

        assert!(parse_geosearch(&json!({})).unwrap().is_empty());
        assert!(parse_geosearch(&json!({"query": {}})).unwrap().is_empty());

        let err = parse_geosearch(&json!([])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
        let err = parse_geosearch(&json!({"query": {"geosearch": [{"title": "no id"}]}})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }

    #[test]
    fn test_extract_text_is_verbatim() {
        let response = fixtures::extract_louvre();
        let raw = response["query"]["pages"]["681159"]["extract"].as_str().unwrap().to_string();

        let result = parse_extract(&response, PageCandidate { page_id: 681_159 }).unwrap();
        assert_eq!(result.extract, raw);
        assert!(result.extract.starts_with("<p class=\"mw-empty-elt\">"));
    }

    #[test]
    fn test_parse_extract_wrong_page() {
        let err = parse_extract(&fixtures::extract_for(1, "x"), PageCandidate { page_id: 2 }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);

        let err = parse_extract(&json!({"batchcomplete": ""}), PageCandidate { page_id: 2 }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedResponse);
    }
}
