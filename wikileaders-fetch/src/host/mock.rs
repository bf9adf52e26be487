//! Scripted in-memory transport.
//!
//! Replies are queued per URL. Each request pops the next reply; the last one
//! repeats forever, so a route can script a few failures and then settle.
//! Requests to unscripted URLs fail with a connection error.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use super::http::{HttpRequest, HttpResponse, Transport};
use crate::error::HttpError;

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Answer with a response.
    Response(HttpResponse),
    /// Fail at the transport level.
    Error(String),
}

impl MockReply {
    /// A 200 response with `body`.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::Response(HttpResponse::new(200, body))
    }

    /// An empty response with `status`.
    pub fn status(status: u16) -> Self {
        Self::Response(HttpResponse::new(status, ""))
    }

    /// A 200 response that sets one cookie.
    pub fn cookie(name: &str, value: &str) -> Self {
        Self::Response(HttpResponse::new(200, "").with_cookie(name, value))
    }

    /// A transport failure.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }
}

#[derive(Debug)]
struct Route {
    delay: Option<Duration>,
    replies: VecDeque<MockReply>,
}

/// In-memory [`Transport`] driven by scripted replies.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Creates a transport with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `reply` for `url`.
    pub fn on(&self, url: &str, reply: MockReply) -> &Self {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        routes
            .entry(url.to_string())
            .or_insert_with(|| Route {
                delay: None,
                replies: VecDeque::new(),
            })
            .replies
            .push_back(reply);
        self
    }

    /// Delays every reply for `url` by `delay`.
    pub fn delay(&self, url: &str, delay: Duration) -> &Self {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        routes
            .entry(url.to_string())
            .or_insert_with(|| Route {
                delay: None,
                replies: VecDeque::new(),
            })
            .delay = Some(delay);
        self
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received for `url`.
    pub fn calls_to(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|r| r.url.as_str() == url)
            .count()
    }

    fn next_reply(&self, url: &str) -> (Option<Duration>, Option<MockReply>) {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(route) = routes.get_mut(url) else {
            return (None, None);
        };
        let reply = if route.replies.len() > 1 {
            route.replies.pop_front()
        } else {
            route.replies.front().cloned()
        };
        (route.delay, reply)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = request.url.to_string();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let (delay, reply) = self.next_reply(&url);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Error(message)) => Err(HttpError::Connection(message)),
            None => Err(HttpError::Connection(format!("no route for {url}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn request(url: &str) -> HttpRequest {
        HttpRequest::new(Url::parse(url).unwrap())
    }

    #[tokio::test]
    async fn test_last_reply_repeats() {
        let transport = MockTransport::new();
        transport
            .on("https://api.test/check", MockReply::status(422))
            .on("https://api.test/check", MockReply::ok(""));

        let first = transport.get(request("https://api.test/check")).await.unwrap();
        let second = transport.get(request("https://api.test/check")).await.unwrap();
        let third = transport.get(request("https://api.test/check")).await.unwrap();

        assert_eq!(first.status, 422);
        assert_eq!(second.status, 200);
        assert_eq!(third.status, 200);
        assert_eq!(transport.calls_to("https://api.test/check"), 3);
    }

    #[tokio::test]
    async fn test_unknown_route_fails() {
        let transport = MockTransport::new();
        let err = transport.get(request("https://nowhere.test/")).await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(transport.requests().len(), 1);
    }
}
