//! [`FakeUpstream`]: a mock of the twitterapi.io REST surface.
//!
//! Wraps a `wiremock` server. Mount canned responses per method and path,
//! point the client's `base_url` at [`FakeUpstream::base_url`], then inspect
//! what actually went over the wire with [`FakeUpstream::requests`].
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn demo() {
//! use twapi_test_utils::FakeUpstream;
//! use serde_json::json;
//!
//! let upstream = FakeUpstream::start().await;
//! upstream.mock_get("/user/info", json!({"data": {"userName": "jack"}})).await;
//! // ... call the client ...
//! assert_eq!(upstream.request_count().await, 1);
//! # }
//! ```

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// One request received by the fake upstream, flattened for assertions.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Decoded query pairs in wire order
    pub query: Vec<(String, String)>,
    /// Header names are lowercase
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    fn from_wiremock(request: &Request) -> Self {
        Self {
            method: request.method.to_string(),
            path: request.url.path().to_string(),
            query: request
                .url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
            headers: request
                .headers
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_lowercase(),
                        value.to_str().unwrap_or_default().to_string(),
                    )
                })
                .collect(),
            body: request.body.clone(),
        }
    }

    /// First query value for `name`.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First header value for `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Body parsed as JSON.
    ///
    /// # Panics
    /// Panics if the body is not valid JSON.
    pub fn json_body(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "request body is not JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }
}

/// A running fake upstream API.
pub struct FakeUpstream {
    server: MockServer,
}

impl FakeUpstream {
    /// Start a new server on a random local port.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to use as the client's `base_url`.
    pub fn base_url(&self) -> String {
        self.server.uri()
    }

    /// Underlying wiremock server for advanced configuration.
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Respond to `GET path` with `200` and a JSON body.
    pub async fn mock_get(&self, request_path: &str, body: Value) {
        self.mock_status("GET", request_path, 200, body).await;
    }

    /// Respond to `POST path` with `200` and a JSON body.
    pub async fn mock_post(&self, request_path: &str, body: Value) {
        self.mock_status("POST", request_path, 200, body).await;
    }

    /// Respond to `http_method path` with an arbitrary status and JSON body.
    pub async fn mock_status(&self, http_method: &str, request_path: &str, status: u16, body: Value) {
        Mock::given(method(http_method))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Respond with a raw, non-JSON body.
    pub async fn mock_text(&self, http_method: &str, request_path: &str, status: u16, body: &str) {
        Mock::given(method(http_method))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Respond only after `delay`, for timeout tests.
    pub async fn mock_delayed(&self, http_method: &str, request_path: &str, delay: Duration) {
        Mock::given(method(http_method))
            .and(path(request_path))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({}))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Every request received so far, in arrival order.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(RecordedRequest::from_wiremock)
            .collect()
    }

    /// Requests received for a given path.
    pub async fn requests_to(&self, request_path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.path == request_path)
            .collect()
    }

    /// The single request received for `path`.
    ///
    /// # Panics
    /// Panics unless exactly one request hit `path`.
    pub async fn only_request_to(&self, request_path: &str) -> RecordedRequest {
        let mut hits = self.requests_to(request_path).await;
        assert_eq!(
            hits.len(),
            1,
            "expected exactly one request to {request_path}, got {}",
            hits.len()
        );
        hits.remove(0)
    }

    /// Number of requests received so far.
    pub async fn request_count(&self) -> usize {
        self.requests().await.len()
    }
}
