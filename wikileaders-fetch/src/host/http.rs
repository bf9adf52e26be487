//! HTTP transport with cookie support and tracing.
//!
//! Every network request in the crate goes through the [`Transport`] trait so
//! the session and fetcher can be driven by a scripted transport in tests.

use async_trait::async_trait;
use reqwest::{Client, header};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for WikiLeaders.
const USER_AGENT: &str = concat!("WikiLeaders/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Cookie
// ============================================================================

/// A name/value cookie pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
}

impl Cookie {
    /// Creates a cookie.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parses the leading pair of a `Set-Cookie` header value.
    ///
    /// Attributes after the first `;` (path, expiry, flags) are ignored.
    pub fn parse_set_cookie(header: &str) -> Option<Self> {
        let pair = header.split(';').next()?.trim();
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name, value.trim()))
    }
}

// ============================================================================
// Request / Response
// ============================================================================

/// An outgoing GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Target URL.
    pub url: Url,
    /// Value for the `Cookie` header, if any.
    pub cookie_header: Option<String>,
}

impl HttpRequest {
    /// Creates a request without cookies.
    pub fn new(url: Url) -> Self {
        Self {
            url,
            cookie_header: None,
        }
    }

    /// Attaches a `Cookie` header value.
    pub fn with_cookie_header(mut self, value: impl Into<String>) -> Self {
        self.cookie_header = Some(value.into());
        self
    }
}

/// A fully read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
    /// Cookies set by the server.
    pub cookies: Vec<Cookie>,
}

impl HttpResponse {
    /// Creates a response without cookies.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            cookies: Vec::new(),
        }
    }

    /// Adds a cookie to the response.
    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.push(Cookie::new(name, value));
        self
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Performs GET requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a GET request and reads the whole body.
    ///
    /// Non-2xx statuses are returned as responses, not errors.
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// ============================================================================
// HTTP Client
// ============================================================================

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let inner = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl Transport for HttpClient {
    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        debug!(with_cookies = request.cookie_header.is_some(), "GET request");

        let mut builder = self.inner.get(request.url);
        if let Some(cookies) = request.cookie_header {
            builder = builder.header(header::COOKIE, cookies);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(Cookie::parse_set_cookie)
            .collect();
        let body = response.text().await?;

        debug!(status, bytes = body.len(), "Response received");
        Ok(HttpResponse {
            status,
            body,
            cookies,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_set_cookie() {
        let cookie = Cookie::parse_set_cookie("user_cookie=abc-123; Path=/; HttpOnly").unwrap();
        assert_eq!(cookie, Cookie::new("user_cookie", "abc-123"));
    }

    #[test]
    fn test_parse_set_cookie_rejects_garbage() {
        assert!(Cookie::parse_set_cookie("no-equals-sign").is_none());
        assert!(Cookie::parse_set_cookie("=value").is_none());
    }

    #[test]
    fn test_response_success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
    }

    #[test]
    fn test_client_creation() {
        assert!(HttpClient::with_timeout(Duration::from_secs(5)).is_ok());
    }
}
