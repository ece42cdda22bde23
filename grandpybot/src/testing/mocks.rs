//! Scripted collaborators for testing.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::{ChatBotError, Result};
use crate::http::{ApiRequest, JsonFetcher};
use crate::random::IndexPicker;

/// What a scripted route answers.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedResponse {
    /// A decoded JSON body.
    Json(serde_json::Value),
    /// A non-2xx status.
    Status(u16),
}

#[derive(Debug, Clone)]
struct Route {
    key: String,
    value: String,
    response: ScriptedResponse,
}

/// A fetcher answering from routes matched on one query parameter.
///
/// Routes are tried in insertion order. A request no route matches fails with
/// a network error.
#[derive(Debug, Default)]
pub struct MockFetcher {
    routes: Vec<Route>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockFetcher {
    /// Creates a fetcher with no routes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `response` to requests whose `key` parameter equals `value`.
    #[must_use]
    pub fn respond_when(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        response: serde_json::Value,
    ) -> Self {
        self.routes.push(Route {
            key: key.into(),
            value: value.into(),
            response: ScriptedResponse::Json(response),
        });
        self
    }

    /// Answers an HTTP `status` error to matching requests.
    #[must_use]
    pub fn fail_when(mut self, key: impl Into<String>, value: impl Into<String>, status: u16) -> Self {
        self.routes.push(Route {
            key: key.into(),
            value: value.into(),
            response: ScriptedResponse::Status(status),
        });
        self
    }

    /// Returns the requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Forgets recorded requests.
    pub fn reset(&self) {
        self.requests.lock().clear();
    }
}

#[async_trait]
impl JsonFetcher for MockFetcher {
    async fn get_json(&self, request: &ApiRequest) -> Result<serde_json::Value> {
        self.requests.lock().push(request.clone());

        let route = self
            .routes
            .iter()
            .find(|route| request.param_value(&route.key) == Some(route.value.as_str()));

        match route.map(|r| &r.response) {
            Some(ScriptedResponse::Json(value)) => Ok(value.clone()),
            Some(ScriptedResponse::Status(status)) => Err(ChatBotError::HttpStatus {
                url: request.url.clone(),
                status: *status,
            }),
            None => Err(ChatBotError::network(&request.url, "no scripted response")),
        }
    }
}

/// Always picks the same index.
#[derive(Debug, Clone, Copy)]
pub struct FixedPicker(pub usize);

impl IndexPicker for FixedPicker {
    fn pick(&self, _bound: usize) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_routes_and_recording() {
        let fetcher = MockFetcher::new()
            .respond_when("q", "Paris", json!([1]))
            .fail_when("q", "Lyon", 503);

        let ok = fetcher
            .get_json(&ApiRequest::get("https://x").param("q", "Paris"))
            .await
            .unwrap();
        assert_eq!(ok, json!([1]));

        let err = fetcher
            .get_json(&ApiRequest::get("https://x").param("q", "Lyon"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatBotError::HttpStatus { status: 503, .. }));

        let err = fetcher
            .get_json(&ApiRequest::get("https://x").param("q", "Nice"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::Network);

        assert_eq!(fetcher.call_count(), 3);
        fetcher.reset();
        assert!(fetcher.requests().is_empty());
    }

    #[test]
    fn test_fixed_picker_blocking() {
        // Exercise the mock outside of a runtime.
        let fetcher = MockFetcher::new().respond_when("a", "b", json!({}));
        let value = tokio_test::block_on(fetcher.get_json(&ApiRequest::get("u").param("a", "b")));
        assert_eq!(value.unwrap(), json!({}));
        assert_eq!(FixedPicker(3).pick(10), 3);
    }
}
