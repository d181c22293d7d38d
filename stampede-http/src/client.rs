//! HTTP client implementation

use crate::errors::HttpError;
use crate::metrics::{MetricsSink, NullMetrics, RequestOutcome, SharedMetrics, ValidationFailure};
use crate::types::HttpMethod;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use stampede_config::TargetConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// A validated response from the store API.
///
/// The body is parsed once here; resource clients decode it into typed
/// records and never re-parse text.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,

    /// Wall-clock time from send to fully-read body
    pub latency: Duration,

    /// Response body size in bytes
    pub bytes: u64,

    /// Parsed JSON body, `Null` when the body was empty or unparseable
    pub body: JsonValue,
}

impl ApiResponse {
    /// Whether the status is in the 2xx range
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body into a typed record
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.body.clone())
    }
}

/// Canned response served in offline mode
#[derive(Debug, Clone)]
struct MockResponse {
    status: u16,
    body: JsonValue,
}

/// One entry of a parallel request batch
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub operation: &'static str,
    pub method: HttpMethod,
    pub path: String,
}

impl BatchRequest {
    pub fn get(operation: &'static str, path: impl Into<String>) -> Self {
        Self {
            operation,
            method: HttpMethod::Get,
            path: path.into(),
        }
    }
}

/// HTTP client for the store API with offline mock support.
///
/// Each virtual user owns one client; the underlying connection pool is
/// built once and reused for every request. Every call is validated against
/// the target's expectations (status, latency budget, body shape) and the
/// outcome is pushed to the attached [`MetricsSink`].
#[derive(Clone)]
pub struct StoreClient {
    config: TargetConfig,
    client: reqwest::Client,
    offline: bool,
    mocks: HashMap<String, MockResponse>,
    bearer_token: Option<String>,
    metrics: SharedMetrics,
}

impl std::fmt::Debug for StoreClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClient")
            .field("base_url", &self.config.base_url)
            .field("offline", &self.offline)
            .field("mocks", &self.mocks.len())
            .field("authenticated", &self.bearer_token.is_some())
            .finish()
    }
}

impl StoreClient {
    /// Create a client for the given target with no metrics sink attached
    pub fn new(config: TargetConfig) -> Result<Self, HttpError> {
        debug!(
            base_url = %config.base_url,
            timeout_secs = config.timeout.as_secs(),
            "creating store client"
        );
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects as usize))
            .build()?;

        Ok(Self {
            config,
            client,
            offline: false,
            mocks: HashMap::new(),
            bearer_token: None,
            metrics: Arc::new(NullMetrics),
        })
    }

    /// Attach a metrics sink receiving every request outcome
    pub fn with_metrics(mut self, metrics: SharedMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Serve requests from the mock table instead of the network
    pub fn set_offline(&mut self) {
        self.offline = true;
        debug!("store client set to offline mode");
    }

    /// Resume real network requests
    pub fn set_online(&mut self) {
        self.offline = false;
        debug!("store client set to online mode");
    }

    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Register a mock answering `method path` with the method's default
    /// success status
    pub fn add_mock(&mut self, method: HttpMethod, path: &str, body: JsonValue) {
        self.add_mock_with_status(method, path, method.expected_status(), body);
    }

    /// Register a mock with an explicit status. A `null` body models an
    /// empty response.
    pub fn add_mock_with_status(&mut self, method: HttpMethod, path: &str, status: u16, body: JsonValue) {
        let key = mock_key(method, path);
        debug!(%key, status, "registered mock response");
        self.mocks.insert(key, MockResponse { status, body });
    }

    /// Drop all registered mocks
    pub fn clear_mocks(&mut self) {
        self.mocks.clear();
    }

    /// Store or clear the bearer token sent with subsequent requests
    pub fn set_bearer_token(&mut self, token: Option<String>) {
        self.bearer_token = token;
    }

    pub fn has_bearer_token(&self) -> bool {
        self.bearer_token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub async fn get(&self, operation: &'static str, path: &str) -> Result<ApiResponse, HttpError> {
        self.request(operation, HttpMethod::Get, path, None).await
    }

    pub async fn post(
        &self,
        operation: &'static str,
        path: &str,
        body: &JsonValue,
    ) -> Result<ApiResponse, HttpError> {
        self.request(operation, HttpMethod::Post, path, Some(body)).await
    }

    pub async fn put(
        &self,
        operation: &'static str,
        path: &str,
        body: &JsonValue,
    ) -> Result<ApiResponse, HttpError> {
        self.request(operation, HttpMethod::Put, path, Some(body)).await
    }

    pub async fn patch(
        &self,
        operation: &'static str,
        path: &str,
        body: &JsonValue,
    ) -> Result<ApiResponse, HttpError> {
        self.request(operation, HttpMethod::Patch, path, Some(body)).await
    }

    pub async fn delete(&self, operation: &'static str, path: &str) -> Result<ApiResponse, HttpError> {
        self.request(operation, HttpMethod::Delete, path, None).await
    }

    /// Issue a request expecting the method's default success status
    pub async fn request(
        &self,
        operation: &'static str,
        method: HttpMethod,
        path: &str,
        body: Option<&JsonValue>,
    ) -> Result<ApiResponse, HttpError> {
        self.request_expecting(operation, method, path, body, method.expected_status())
            .await
    }

    /// Issue a request validated against an explicit expected status
    pub async fn request_expecting(
        &self,
        operation: &'static str,
        method: HttpMethod,
        path: &str,
        body: Option<&JsonValue>,
        expected_status: u16,
    ) -> Result<ApiResponse, HttpError> {
        if self.offline {
            return self.answer_from_mocks(operation, method, path, expected_status).await;
        }

        let url = self.absolute_url(path)?;
        debug!(%method, %url, "sending request");
        let start = Instant::now();

        let mut request = self.client.request(method.into(), &url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                self.record_transport_failure(operation, method, path, start, &err).await;
                return Err(err.into());
            }
        };

        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                self.record_transport_failure(operation, method, path, start, &err).await;
                return Err(err.into());
            }
        };
        let latency = start.elapsed();

        let parsed: Option<JsonValue> = if text.is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };
        let body_is_json = parsed.is_some();

        let api_response = ApiResponse {
            status,
            latency,
            bytes: text.len() as u64,
            body: parsed.unwrap_or(JsonValue::Null),
        };

        let failure = self.validate(status, expected_status, latency, text.is_empty(), body_is_json);
        self.record(operation, method, path, &api_response, failure).await;

        Ok(api_response)
    }

    /// Run several requests in parallel, preserving input order in the output
    pub async fn batch(&self, requests: Vec<BatchRequest>) -> Vec<Result<ApiResponse, HttpError>> {
        futures::future::join_all(requests.into_iter().map(|entry| async move {
            self.request(entry.operation, entry.method, &entry.path, None).await
        }))
        .await
    }

    async fn answer_from_mocks(
        &self,
        operation: &'static str,
        method: HttpMethod,
        path: &str,
        expected_status: u16,
    ) -> Result<ApiResponse, HttpError> {
        let start = Instant::now();
        let key = mock_key(method, path);

        let Some(mock) = self.mocks.get(&key) else {
            debug!(%key, "no mock response registered");
            let outcome = RequestOutcome {
                operation,
                method,
                path: path.to_string(),
                status: 0,
                latency_ms: 0,
                bytes: 0,
                failure: Some(ValidationFailure::Transport {
                    message: "no mock response in offline mode".to_string(),
                }),
            };
            self.metrics.record(outcome).await;
            return Err(HttpError::NoMock {
                method,
                path: path.to_string(),
            });
        };

        let body_is_empty = mock.body.is_null();
        let bytes = if body_is_empty {
            0
        } else {
            serde_json::to_string(&mock.body).map(|s| s.len() as u64).unwrap_or(0)
        };
        let latency = start.elapsed();

        let api_response = ApiResponse {
            status: mock.status,
            latency,
            bytes,
            body: mock.body.clone(),
        };

        let failure = self.validate(mock.status, expected_status, latency, body_is_empty, !body_is_empty);
        self.record(operation, method, path, &api_response, failure).await;

        Ok(api_response)
    }

    /// Apply the response checks in order; the first failed check wins.
    fn validate(
        &self,
        status: u16,
        expected_status: u16,
        latency: Duration,
        body_empty: bool,
        body_is_json: bool,
    ) -> Option<ValidationFailure> {
        let latency_ms = latency.as_millis() as u64;
        let budget_ms = self.config.response_time_budget_ms;

        if status != expected_status {
            Some(ValidationFailure::StatusMismatch {
                expected: expected_status,
                actual: status,
            })
        } else if latency_ms >= budget_ms {
            Some(ValidationFailure::OverBudget { latency_ms, budget_ms })
        } else if body_empty {
            Some(ValidationFailure::EmptyBody)
        } else if !body_is_json {
            Some(ValidationFailure::InvalidJson)
        } else {
            None
        }
    }

    async fn record(
        &self,
        operation: &'static str,
        method: HttpMethod,
        path: &str,
        response: &ApiResponse,
        failure: Option<ValidationFailure>,
    ) {
        if let Some(failure) = &failure {
            debug!(operation, %method, path, %failure, "response failed validation");
        }
        let outcome = RequestOutcome {
            operation,
            method,
            path: path.to_string(),
            status: response.status,
            latency_ms: response.latency.as_millis() as u64,
            bytes: response.bytes,
            failure,
        };
        self.metrics.record(outcome).await;
    }

    async fn record_transport_failure(
        &self,
        operation: &'static str,
        method: HttpMethod,
        path: &str,
        start: Instant,
        err: &reqwest::Error,
    ) {
        let outcome = RequestOutcome {
            operation,
            method,
            path: path.to_string(),
            status: 0,
            latency_ms: start.elapsed().as_millis() as u64,
            bytes: 0,
            failure: Some(ValidationFailure::Transport {
                message: err.to_string(),
            }),
        };
        self.metrics.record(outcome).await;
    }

    fn absolute_url(&self, path: &str) -> Result<String, HttpError> {
        if !path.starts_with('/') {
            return Err(HttpError::InvalidUrl(format!(
                "request path must start with '/', got '{}'",
                path
            )));
        }
        Ok(format!("{}{}", self.config.base_url.trim_end_matches('/'), path))
    }
}

fn mock_key(method: HttpMethod, path: &str) -> String {
    format!("{}:{}", method.as_str(), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct CapturingSink {
        outcomes: Mutex<Vec<RequestOutcome>>,
    }

    #[async_trait::async_trait]
    impl MetricsSink for CapturingSink {
        async fn record(&self, outcome: RequestOutcome) {
            self.outcomes.lock().await.push(outcome);
        }
    }

    fn offline_client() -> StoreClient {
        let mut client = StoreClient::new(TargetConfig::default()).unwrap();
        client.set_offline();
        client
    }

    #[tokio::test]
    async fn test_mock_roundtrip() {
        let mut client = offline_client();
        client.add_mock(HttpMethod::Get, "/products/1", json!({"id": 1, "title": "Mug"}));

        let response = client.get("product_by_id", "/products/1").await.unwrap();
        assert!(response.ok());
        assert_eq!(response.status, 200);
        assert_eq!(response.body["title"], "Mug");
    }

    #[tokio::test]
    async fn test_missing_mock_is_an_error() {
        let client = offline_client();
        let err = client.get("product_by_id", "/products/1").await.unwrap_err();
        assert!(matches!(err, HttpError::NoMock { .. }));
    }

    #[tokio::test]
    async fn test_status_mismatch_is_recorded_but_response_is_returned() {
        let sink = Arc::new(CapturingSink::default());
        let mut client = offline_client().with_metrics(sink.clone());
        client.add_mock_with_status(HttpMethod::Get, "/products/999", 404, json!({"message": "not found"}));

        let response = client.get("product_by_id", "/products/999").await.unwrap();
        assert!(!response.ok());
        assert_eq!(response.status, 404);

        let outcomes = sink.outcomes.lock().await;
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(
            outcomes[0].failure,
            Some(ValidationFailure::StatusMismatch { expected: 200, actual: 404 })
        ));
    }

    #[tokio::test]
    async fn test_null_mock_body_fails_empty_body_check() {
        let sink = Arc::new(CapturingSink::default());
        let mut client = offline_client().with_metrics(sink.clone());
        client.add_mock_with_status(HttpMethod::Delete, "/products/1", 200, JsonValue::Null);

        let response = client.delete("delete_product", "/products/1").await.unwrap();
        assert_eq!(response.status, 200);

        let outcomes = sink.outcomes.lock().await;
        assert!(matches!(outcomes[0].failure, Some(ValidationFailure::EmptyBody)));
    }

    #[tokio::test]
    async fn test_post_expects_201_from_mock() {
        let sink = Arc::new(CapturingSink::default());
        let mut client = offline_client().with_metrics(sink.clone());
        client.add_mock(HttpMethod::Post, "/products", json!({"id": 42}));

        let response = client
            .post("create_product", "/products", &json!({"title": "New"}))
            .await
            .unwrap();
        assert_eq!(response.status, 201);
        assert!(sink.outcomes.lock().await[0].passed());
    }

    #[tokio::test]
    async fn test_batch_preserves_request_order() {
        let mut client = offline_client();
        client.add_mock(HttpMethod::Get, "/products/1", json!({"id": 1}));
        client.add_mock(HttpMethod::Get, "/products/2", json!({"id": 2}));

        let results = client
            .batch(vec![
                BatchRequest::get("product_by_id", "/products/1"),
                BatchRequest::get("product_by_id", "/products/2"),
                BatchRequest::get("product_by_id", "/products/3"),
            ])
            .await;

        assert_eq!(results[0].as_ref().unwrap().body["id"], 1);
        assert_eq!(results[1].as_ref().unwrap().body["id"], 2);
        assert!(results[2].is_err());
    }

    #[tokio::test]
    async fn test_bearer_token_lifecycle() {
        let mut client = offline_client();
        assert!(!client.has_bearer_token());
        client.set_bearer_token(Some("abc".to_string()));
        assert!(client.has_bearer_token());
        client.set_bearer_token(None);
        assert!(!client.has_bearer_token());
    }

    #[test]
    fn test_absolute_url_joins_base_and_path() {
        let client = StoreClient::new(TargetConfig::default()).unwrap();
        assert_eq!(
            client.absolute_url("/products?offset=0&limit=10").unwrap(),
            "https://api.escuelajs.co/api/v1/products?offset=0&limit=10"
        );
        assert!(client.absolute_url("products").is_err());
    }

    #[test]
    fn test_mock_key_format() {
        assert_eq!(mock_key(HttpMethod::Get, "/products"), "GET:/products");
    }
}
