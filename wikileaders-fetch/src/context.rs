//! Session context bundling the transport, settings and retry policy.
//!
//! Every component of a run (credential manager, metadata client, page
//! fetcher) is built from one [`SessionContext`], so they share a transport
//! and agree on the API base URL.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::client::ApiClient;
use crate::credential::CredentialManager;
use crate::error::FetchError;
use crate::fetcher::DocumentFetcher;
use crate::host::http::{HttpClient, Transport};
use crate::metadata::MetadataClient;
use crate::retry::{Backoff, RetryPolicy};

/// Default leaders API.
pub const DEFAULT_API_BASE_URL: &str = "https://country-leaders.onrender.com";

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for API and page requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Leaders API base URL.
    pub api_base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum concurrent page fetches.
    pub concurrency: usize,
    /// Fetched pages buffered ahead of extraction.
    pub channel_capacity: usize,
    /// Maximum attempts for credential and metadata requests.
    pub max_retries: u32,
    /// Base delay between attempts.
    pub retry_delay: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            concurrency: 8,
            channel_capacity: 32,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl FetchSettings {
    /// Creates settings with custom timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates settings with a custom concurrency limit.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Creates settings pointing at another API.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// The automatic retry schedule these settings describe.
    pub fn backoff(&self) -> Backoff {
        Backoff::new(self.max_retries.max(1)).with_base_delay(self.retry_delay)
    }
}

// ============================================================================
// Session Context
// ============================================================================

/// Shared state of one scraping run.
#[derive(Clone)]
pub struct SessionContext {
    /// Transport for every request.
    pub transport: Arc<dyn Transport>,
    /// Retry policy for credential and metadata requests.
    pub retry: RetryPolicy,
    /// Fetch settings.
    pub settings: FetchSettings,
    api: ApiClient,
}

impl SessionContext {
    /// Creates a context with the default HTTP transport and settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::builder().build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> SessionContextBuilder {
        SessionContextBuilder::new()
    }

    /// Client for the leaders API.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Credential manager over this session's API client.
    pub fn credential_manager(&self) -> CredentialManager {
        CredentialManager::new(self.api.clone())
    }

    /// Metadata client over this session's API client.
    pub fn metadata_client(&self) -> MetadataClient {
        MetadataClient::new(self.api.clone(), self.credential_manager())
    }

    /// Page fetcher sharing this session's transport.
    pub fn document_fetcher(&self) -> DocumentFetcher {
        DocumentFetcher::new(Arc::clone(&self.transport), self.settings.concurrency)
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("settings", &self.settings)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Session Context Builder
// ============================================================================

/// Builder for [`SessionContext`].
#[derive(Default)]
pub struct SessionContextBuilder {
    transport: Option<Arc<dyn Transport>>,
    retry: Option<RetryPolicy>,
    settings: FetchSettings,
}

impl SessionContextBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the retry policy. Defaults to the settings' backoff.
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Sets the fetch settings.
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Builds the context.
    pub fn build(self) -> Result<SessionContext, FetchError> {
        let base_url = Url::parse(&self.settings.api_base_url)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", self.settings.api_base_url)))?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpClient::with_timeout(self.settings.timeout)?),
        };
        let retry = self
            .retry
            .unwrap_or_else(|| RetryPolicy::Attempts(self.settings.backoff()));
        let api = ApiClient::new(Arc::clone(&transport), base_url, retry.clone());

        Ok(SessionContext {
            transport,
            retry,
            settings: self.settings,
            api,
        })
    }
}
