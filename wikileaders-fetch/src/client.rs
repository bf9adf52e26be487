//! Client for the leaders API.

use std::sync::Arc;

use tracing::{debug, instrument, warn};
use url::Url;

use crate::credential::Credential;
use crate::error::FetchError;
use crate::host::http::{HttpRequest, HttpResponse, Transport};
use crate::retry::{RetryContext, RetryDecision, RetryPolicy};

/// Issues requests against the leaders API base URL.
///
/// Transport failures are retried according to the [`RetryPolicy`]; HTTP
/// statuses are returned to the caller untouched.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Creates a client. The base URL is treated as a directory.
    pub fn new(transport: Arc<dyn Transport>, mut base_url: Url, retry: RetryPolicy) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            transport,
            base_url,
            retry,
        }
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the URL for `endpoint` with query parameters.
    pub fn endpoint_url(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Url, FetchError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| FetchError::InvalidUrl(format!("{endpoint}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Performs a GET on `endpoint`, attaching `credential` when given.
    #[instrument(skip(self, credential, query))]
    pub async fn get(
        &self,
        endpoint: &str,
        credential: Option<&Credential>,
        query: &[(&str, &str)],
    ) -> Result<HttpResponse, FetchError> {
        let url = self.endpoint_url(endpoint, query)?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut request = HttpRequest::new(url.clone());
            if let Some(credential) = credential {
                request = request.with_cookie_header(credential.header_value());
            }

            match self.transport.get(request).await {
                Ok(response) => {
                    debug!(status = response.status, attempt, "API response");
                    return Ok(response);
                }
                Err(e) if e.is_transient() => {
                    warn!(error = %e, attempt, "Connection error");
                    self.retry_or_abort(endpoint, attempt, e.to_string()).await?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Consults the retry policy, sleeping before the next attempt.
    ///
    /// Returns [`FetchError::Aborted`] when the policy gives up.
    pub async fn retry_or_abort(
        &self,
        operation: &str,
        attempt: u32,
        reason: String,
    ) -> Result<(), FetchError> {
        let context = RetryContext {
            operation: operation.to_string(),
            attempt,
            reason,
        };

        match self.retry.decide(context.clone()).await {
            RetryDecision::RetryAfter(delay) => {
                if !delay.is_zero() {
                    debug!(?delay, "Waiting before retry");
                    tokio::time::sleep(delay).await;
                }
                Ok(())
            }
            RetryDecision::GiveUp => Err(FetchError::Aborted {
                operation: context.operation,
                attempts: context.attempt,
                reason: context.reason,
            }),
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::{MockReply, MockTransport};
    use crate::retry::Backoff;
    use std::time::Duration;

    fn client(transport: Arc<MockTransport>, retry: RetryPolicy) -> ApiClient {
        ApiClient::new(transport, Url::parse("https://api.test").unwrap(), retry)
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let api = ApiClient::new(
            Arc::new(MockTransport::new()),
            Url::parse("https://host.test/v1").unwrap(),
            RetryPolicy::no_retry(),
        );
        let url = api.endpoint_url("leaders", &[("country", "fr")]).unwrap();
        assert_eq!(url.as_str(), "https://host.test/v1/leaders?country=fr");
    }

    #[tokio::test]
    async fn test_connection_errors_are_retried() {
        let transport = Arc::new(MockTransport::new());
        transport
            .on("https://api.test/countries", MockReply::error("reset"))
            .on("https://api.test/countries", MockReply::ok("[]"));

        let api = client(
            Arc::clone(&transport),
            RetryPolicy::Attempts(Backoff::new(3).with_base_delay(Duration::ZERO)),
        );
        let response = api.get("countries", None, &[]).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(transport.calls_to("https://api.test/countries"), 2);
    }

    #[tokio::test]
    async fn test_gives_up_when_policy_declines() {
        let transport = Arc::new(MockTransport::new());
        transport.on("https://api.test/countries", MockReply::error("refused"));

        let api = client(Arc::clone(&transport), RetryPolicy::no_retry());
        let err = api.get("countries", None, &[]).await.unwrap_err();

        assert!(matches!(err, FetchError::Aborted { attempts: 1, .. }));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn test_statuses_are_not_retried() {
        let transport = Arc::new(MockTransport::new());
        transport.on("https://api.test/countries", MockReply::status(500));

        let api = client(
            Arc::clone(&transport),
            RetryPolicy::Attempts(Backoff::new(3).with_base_delay(Duration::ZERO)),
        );
        let response = api.get("countries", None, &[]).await.unwrap();

        assert_eq!(response.status, 500);
        assert_eq!(transport.calls_to("https://api.test/countries"), 1);
    }

    #[tokio::test]
    async fn test_credential_is_sent_as_cookie_header() {
        let transport = Arc::new(MockTransport::new());
        transport.on("https://api.test/check", MockReply::ok(""));

        let api = client(Arc::clone(&transport), RetryPolicy::no_retry());
        let credential = Credential::from_cookies(vec![crate::host::Cookie::new("user_cookie", "x1")]);
        api.get("check", Some(&credential), &[]).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].cookie_header.as_deref(), Some("user_cookie=x1"));
    }
}
