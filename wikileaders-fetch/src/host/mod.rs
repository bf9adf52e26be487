//! Transport layer for API and page requests.
//!
//! - [`http`] - The [`Transport`] seam and its reqwest implementation
//! - `mock` - Scripted in-memory transport for tests (`test-util` feature)

pub mod http;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

// Re-export key types
pub use http::{Cookie, HttpClient, HttpRequest, HttpResponse, Transport};
#[cfg(any(test, feature = "test-util"))]
pub use mock::{MockReply, MockTransport};
