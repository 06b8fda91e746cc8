//! HTTP client abstraction
//!
//! Every outbound call goes through the [`HttpClient`] trait so the
//! authenticator can wrap it and tests can swap in [`MockHttpClient`].

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Method, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use std::str::FromStr;
use tracing::{debug, trace};

use crate::error::{ConsoleError, ConsoleResult};

const AUTHORIZATION: &str = "Authorization";
const BEARER_PREFIX: &str = "Bearer ";

/// An outbound request. Cheap to clone so it can be replayed after a refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    /// Serialize `payload` as the JSON body
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> ConsoleResult<Self> {
        self.body = Some(serde_json::to_string(payload)?);
        self.headers
            .insert(CONTENT_TYPE.as_str().to_string(), "application/json".to_string());
        Ok(self)
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Attach (or replace) the bearer credential
    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header(AUTHORIZATION, format!("{BEARER_PREFIX}{token}"))
    }

    /// The bearer credential carried by this request, if any
    pub fn bearer(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(AUTHORIZATION))
            .and_then(|(_, value)| value.strip_prefix(BEARER_PREFIX))
    }
}

/// Simple HTTP response structure for standardized response handling
#[derive(Debug, Clone)]
pub struct SimpleHttpResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body as text
    pub body: String,
}

impl SimpleHttpResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Parse the response body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> ConsoleResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Check if the response is successful (status code 200-299)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    /// The `detail` field of a JSON error body
    pub fn detail(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(&self.body).ok()?;
        value.get("detail")?.as_str().map(str::to_string)
    }

    /// Turn a non-success response into a [`ConsoleError`]
    pub fn error_for_status(self) -> ConsoleResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        if self.is_unauthorized() {
            return Err(ConsoleError::Unauthorized {
                detail: self.detail(),
            });
        }
        Err(ConsoleError::Api {
            status: self.status.as_u16(),
            detail: self.detail(),
            body: self.body,
        })
    }
}

/// HTTP client trait for abstracting HTTP requests
#[async_trait]
pub trait HttpClient: Send + Sync + Debug {
    /// Send a request and return the response whatever its status
    async fn execute(&self, request: HttpRequest) -> ConsoleResult<SimpleHttpResponse>;

    /// Send a GET request
    async fn get(&self, url: &str) -> ConsoleResult<SimpleHttpResponse> {
        self.execute(HttpRequest::get(url)).await
    }

    /// Send a POST request with an optional raw body
    async fn post(&self, url: &str, body: Option<String>) -> ConsoleResult<SimpleHttpResponse> {
        let mut request = HttpRequest::post(url);
        request.body = body;
        self.execute(request).await
    }
}

/// Implementation of HttpClient using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Build a client whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> ConsoleResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConsoleError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> ConsoleResult<SimpleHttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        trace!(%method, %url, "Sending request");

        let mut header_map = HeaderMap::new();
        for (key, value) in headers {
            let name = HeaderName::from_str(&key)
                .map_err(|e| ConsoleError::Transport(format!("Invalid header name {key}: {e}")))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|e| ConsoleError::Transport(format!("Invalid header value: {e}")))?;
            header_map.insert(name, value);
        }

        let mut request_builder = self.client.request(method.clone(), &url).headers(header_map);
        if let Some(body) = body {
            request_builder = request_builder.body(body);
        }

        let response = request_builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        debug!(%method, %url, status = status.as_u16(), "Response received");

        Ok(SimpleHttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[derive(Debug, Clone)]
struct MockRoute {
    method: Method,
    url: String,
    bearer: Option<String>,
    response: SimpleHttpResponse,
    delay: Option<Duration>,
}

/// Mock HTTP client for tests.
///
/// Routes are keyed by method and URL, optionally narrowed to a bearer token.
/// A token-specific route wins over a generic one; among equals, the most
/// recently registered route wins.
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    routes: Arc<RwLock<Vec<MockRoute>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mock response for a method and URL
    pub fn add_response(&self, method: Method, url: &str, response: SimpleHttpResponse) {
        self.routes.write().push(MockRoute {
            method,
            url: url.to_string(),
            bearer: None,
            response,
            delay: None,
        });
    }

    /// Add a mock JSON response for a method and URL
    pub fn add_json_response<T: Serialize>(
        &self,
        method: Method,
        url: &str,
        status: StatusCode,
        data: &T,
    ) -> ConsoleResult<()> {
        self.add_response(method, url, json_response(status, data)?);
        Ok(())
    }

    /// Add a JSON response that only answers requests carrying `bearer`
    pub fn add_authorized_json_response<T: Serialize>(
        &self,
        method: Method,
        url: &str,
        bearer: &str,
        status: StatusCode,
        data: &T,
    ) -> ConsoleResult<()> {
        self.routes.write().push(MockRoute {
            method,
            url: url.to_string(),
            bearer: Some(bearer.to_string()),
            response: json_response(status, data)?,
            delay: None,
        });
        Ok(())
    }

    /// Delay every response registered for this method and URL
    pub fn set_delay(&self, method: Method, url: &str, delay: Duration) {
        for route in self
            .routes
            .write()
            .iter_mut()
            .filter(|r| r.method == method && r.url == url)
        {
            route.delay = Some(delay);
        }
    }

    /// All requests received so far, in arrival order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests received for a method and URL
    pub fn request_count(&self, method: Method, url: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }

    /// Clear all mock responses and recorded requests
    pub fn clear(&self) {
        self.routes.write().clear();
        self.requests.lock().clear();
    }

    fn find_route(&self, request: &HttpRequest) -> Option<MockRoute> {
        let routes = self.routes.read();
        let candidates: Vec<&MockRoute> = routes
            .iter()
            .rev()
            .filter(|r| r.method == request.method && r.url == request.url)
            .collect();
        let bearer = request.bearer();
        candidates
            .iter()
            .find(|r| r.bearer.is_some() && r.bearer.as_deref() == bearer)
            .or_else(|| candidates.iter().find(|r| r.bearer.is_none()))
            .map(|r| MockRoute::clone(r))
    }
}

fn json_response<T: Serialize>(status: StatusCode, data: &T) -> ConsoleResult<SimpleHttpResponse> {
    let mut response = SimpleHttpResponse::new(status, serde_json::to_string(data)?);
    response
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(response)
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: HttpRequest) -> ConsoleResult<SimpleHttpResponse> {
        self.requests.lock().push(request.clone());

        let route = self.find_route(&request).ok_or_else(|| {
            ConsoleError::Transport(format!(
                "No mock response for {} {}",
                request.method, request.url
            ))
        })?;

        if let Some(delay) = route.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(route.response)
    }
}
