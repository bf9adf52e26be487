//! Concurrent page retrieval.
//!
//! Pages are fetched without credentials and without retries, at most
//! `concurrency` at a time. Each fetch resolves on its own; one failure never
//! cancels or delays the others.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};
use url::Url;

use wikileaders_core::{FetchedDocument, Slot};

use crate::error::FetchError;
use crate::host::http::{HttpRequest, Transport};

/// Result of one page fetch, tagged with the slot that asked for it.
#[derive(Debug)]
pub struct DocumentOutcome {
    /// Slot the page belongs to.
    pub slot: Slot,
    /// URL that was fetched.
    pub url: String,
    /// The page, or why it could not be retrieved.
    pub result: Result<FetchedDocument, FetchError>,
}

/// Fetches encyclopedia pages with bounded concurrency.
#[derive(Clone)]
pub struct DocumentFetcher {
    transport: Arc<dyn Transport>,
    concurrency: usize,
}

impl DocumentFetcher {
    /// Creates a fetcher. A concurrency of zero is raised to one.
    pub fn new(transport: Arc<dyn Transport>, concurrency: usize) -> Self {
        Self {
            transport,
            concurrency: concurrency.max(1),
        }
    }

    /// Maximum number of in-flight requests.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetches one page body.
    #[instrument(skip(self))]
    pub async fn fetch_one(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        let response = self.transport.get(HttpRequest::new(parsed)).await?;

        if !response.is_success() {
            warn!(status = response.status, "Page request failed");
            return Err(FetchError::UnexpectedStatus {
                endpoint: url.to_string(),
                status: response.status,
            });
        }

        debug!(bytes = response.body.len(), "Page fetched");
        Ok(response.body)
    }

    /// Fetches every URL once and maps each to its body or error.
    ///
    /// Duplicate URLs are requested once.
    pub async fn fetch_all<I>(&self, urls: I) -> HashMap<String, Result<String, FetchError>>
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        let unique: Vec<String> = urls.into_iter().filter(|u| seen.insert(u.clone())).collect();

        stream::iter(unique)
            .map(|url| async move {
                let result = self.fetch_one(&url).await;
                (url, result)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }

    /// Starts fetching `jobs` in the background.
    ///
    /// Outcomes arrive on the returned channel in completion order. The
    /// channel holds at most `capacity` outcomes; fetching pauses while it is
    /// full. Dropping the receiver stops the remaining work.
    pub fn spawn(&self, jobs: Vec<(Slot, String)>, capacity: usize) -> mpsc::Receiver<DocumentOutcome> {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let fetcher = self.clone();
        let total = jobs.len();

        tokio::spawn(async move {
            let mut outcomes = stream::iter(jobs)
                .map(|(slot, url)| {
                    let fetcher = fetcher.clone();
                    async move {
                        let result = fetcher
                            .fetch_one(&url)
                            .await
                            .map(|body| FetchedDocument::new(slot.clone(), url.clone(), body));
                        DocumentOutcome { slot, url, result }
                    }
                })
                .buffer_unordered(fetcher.concurrency);

            let mut sent = 0usize;
            while let Some(outcome) = outcomes.next().await {
                if tx.send(outcome).await.is_err() {
                    debug!(sent, total, "Outcome receiver dropped, stopping fetches");
                    return;
                }
                sent += 1;
            }
            debug!(sent, "All pages fetched");
        });

        rx
    }
}

impl std::fmt::Debug for DocumentFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentFetcher")
            .field("concurrency", &self.concurrency)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::mock::{MockReply, MockTransport};
    use std::time::Duration;
    use wikileaders_core::Country;

    fn fetcher(transport: &Arc<MockTransport>, concurrency: usize) -> DocumentFetcher {
        let transport: Arc<dyn Transport> = transport.clone();
        DocumentFetcher::new(transport, concurrency)
    }

    #[tokio::test]
    async fn test_fetch_all_isolates_failures() {
        let transport = Arc::new(MockTransport::new());
        transport
            .on("https://w.test/a", MockReply::ok("<p>a</p>"))
            .on("https://w.test/b", MockReply::status(404))
            .on("https://w.test/c", MockReply::ok("<p>c</p>"));

        let results = fetcher(&transport, 2)
            .fetch_all(
                ["a", "b", "c", "d"]
                    .iter()
                    .map(|p| format!("https://w.test/{p}")),
            )
            .await;

        assert_eq!(results.len(), 4);
        assert_eq!(results["https://w.test/a"].as_deref().unwrap(), "<p>a</p>");
        assert!(matches!(
            results["https://w.test/b"],
            Err(FetchError::UnexpectedStatus { status: 404, .. })
        ));
        assert!(matches!(results["https://w.test/d"], Err(FetchError::Http(_))));
        assert!(results["https://w.test/c"].is_ok());
    }

    #[tokio::test]
    async fn test_fetch_all_dedupes() {
        let transport = Arc::new(MockTransport::new());
        transport.on("https://w.test/a", MockReply::ok("x"));

        let urls = vec!["https://w.test/a".to_string(), "https://w.test/a".to_string()];
        let results = fetcher(&transport, 4).fetch_all(urls).await;

        assert_eq!(results.len(), 1);
        assert_eq!(transport.calls_to("https://w.test/a"), 1);
    }

    #[tokio::test]
    async fn test_invalid_url_is_an_error() {
        let transport = Arc::new(MockTransport::new());
        let err = fetcher(&transport, 1).fetch_one("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_spawn_delivers_every_slot() {
        let transport = Arc::new(MockTransport::new());
        transport
            .on("https://w.test/slow", MockReply::ok("slow"))
            .delay("https://w.test/slow", Duration::from_millis(50))
            .on("https://w.test/fast", MockReply::ok("fast"));

        let us = Country::new("us").unwrap();
        let jobs = vec![
            (Slot::new(us.clone(), 0), "https://w.test/slow".to_string()),
            (Slot::new(us.clone(), 1), "https://w.test/fast".to_string()),
            (Slot::new(us.clone(), 2), "https://w.test/missing".to_string()),
        ];

        let mut rx = fetcher(&transport, 3).spawn(jobs, 1);
        let mut outcomes = Vec::new();
        while let Some(outcome) = rx.recv().await {
            outcomes.push(outcome);
        }

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes.last().unwrap().slot.index, 0);

        let slow = outcomes.iter().find(|o| o.slot.index == 0).unwrap();
        let document = slow.result.as_ref().unwrap();
        assert_eq!(document.body(), "slow");
        assert_eq!(document.slot(), &slow.slot);

        let missing = outcomes.iter().find(|o| o.slot.index == 2).unwrap();
        assert!(missing.result.is_err());
    }
}
