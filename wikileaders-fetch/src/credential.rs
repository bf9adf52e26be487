//! Session credential acquisition, validation and refresh.
//!
//! The API hands out a cookie on `/cookie` and reports on `/check` whether
//! it is still good: 200 keeps it, 422 means stale, 403 means the caller is
//! refused outright. The current credential lives in a [`CredentialHandle`]
//! shared by every metadata request of a run.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::client::ApiClient;
use crate::error::FetchError;
use crate::host::http::Cookie;

/// Endpoint issuing a fresh credential.
pub const COOKIE_ENDPOINT: &str = "cookie";

/// Endpoint validating a credential.
pub const CHECK_ENDPOINT: &str = "check";

const STATUS_OK: u16 = 200;
const STATUS_FORBIDDEN: u16 = 403;
const STATUS_STALE: u16 = 422;

// ============================================================================
// Credential
// ============================================================================

/// Opaque session token: the cookies the API set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    cookies: Vec<Cookie>,
}

impl Credential {
    /// Wraps cookies received from the API.
    pub fn from_cookies(cookies: Vec<Cookie>) -> Self {
        Self { cookies }
    }

    /// Returns the cookies.
    pub fn cookies(&self) -> &[Cookie] {
        &self.cookies
    }

    /// Returns true if the API set no cookie.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Formats the cookies as a `Cookie` header value.
    pub fn header_value(&self) -> String {
        self.cookies
            .iter()
            .map(|c| format!("{}={}", c.name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// ============================================================================
// Credential Manager
// ============================================================================

/// Acquires and validates credentials.
#[derive(Debug, Clone)]
pub struct CredentialManager {
    api: ApiClient,
}

impl CredentialManager {
    /// Creates a manager over `api`.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Obtains a fresh credential.
    ///
    /// Non-200 answers go through the retry policy; when it gives up the
    /// result is [`FetchError::Aborted`].
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> Result<Credential, FetchError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            info!(attempt, "Requesting a new credential");

            let response = self.api.get(COOKIE_ENDPOINT, None, &[]).await?;
            if response.status == STATUS_OK {
                let credential = Credential::from_cookies(response.cookies);
                if credential.is_empty() {
                    warn!("Credential endpoint answered without setting a cookie");
                }
                return Ok(credential);
            }

            warn!(status = response.status, "Failed to get a credential");
            self.api
                .retry_or_abort(
                    COOKIE_ENDPOINT,
                    attempt,
                    format!("HTTP {}", response.status),
                )
                .await?;
        }
    }

    /// Checks `current` against the API, acquiring a new credential when stale.
    ///
    /// A 403 is fatal. Any status other than 200 and 403 is treated as stale.
    #[instrument(skip(self, current))]
    pub async fn check(&self, current: &Credential) -> Result<CredentialCheck, FetchError> {
        let response = self.api.get(CHECK_ENDPOINT, Some(current), &[]).await?;

        match response.status {
            STATUS_OK => {
                debug!("Credential still valid");
                Ok(CredentialCheck::Valid)
            }
            STATUS_FORBIDDEN => Err(FetchError::Forbidden {
                endpoint: CHECK_ENDPOINT.to_string(),
            }),
            STATUS_STALE => {
                info!("Credential is stale, refreshing");
                Ok(CredentialCheck::Refreshed(self.acquire().await?))
            }
            status => {
                warn!(status, "Unexpected credential check status, refreshing");
                Ok(CredentialCheck::Refreshed(self.acquire().await?))
            }
        }
    }

    /// Returns `current` if the API still accepts it, otherwise a fresh one.
    pub async fn validate_or_refresh(&self, current: &Credential) -> Result<Credential, FetchError> {
        Ok(match self.check(current).await? {
            CredentialCheck::Valid => current.clone(),
            CredentialCheck::Refreshed(fresh) => fresh,
        })
    }
}

/// Outcome of [`CredentialManager::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialCheck {
    /// The API accepted the credential.
    Valid,
    /// The credential was stale and this one replaces it.
    Refreshed(Credential),
}

// ============================================================================
// Credential Handle
// ============================================================================

#[derive(Debug)]
struct HandleState {
    credential: Credential,
    refreshes: u64,
}

/// Shared, mutable slot holding the run's current credential.
///
/// [`ensure_fresh`](Self::ensure_fresh) holds the lock across the check and
/// the refresh, so concurrent callers that all see a stale credential cause a
/// single refresh and then observe the same new credential.
#[derive(Debug, Clone)]
pub struct CredentialHandle {
    inner: Arc<Mutex<HandleState>>,
}

impl CredentialHandle {
    /// Creates a handle holding `credential`.
    pub fn new(credential: Credential) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HandleState {
                credential,
                refreshes: 0,
            })),
        }
    }

    /// Returns the current credential.
    pub async fn current(&self) -> Credential {
        self.inner.lock().await.credential.clone()
    }

    /// Number of refreshes, counted even when the API re-issued the same cookie.
    pub async fn refreshes(&self) -> u64 {
        self.inner.lock().await.refreshes
    }

    /// Validates the current credential, replacing it if it went stale.
    pub async fn ensure_fresh(&self, manager: &CredentialManager) -> Result<Credential, FetchError> {
        let mut state = self.inner.lock().await;

        if let CredentialCheck::Refreshed(fresh) = manager.check(&state.credential).await? {
            state.refreshes += 1;
            state.credential = fresh;
            info!(refreshes = state.refreshes, "Credential replaced");
        }

        Ok(state.credential.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
