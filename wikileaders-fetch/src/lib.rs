// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # WikiLeaders Fetch
//!
//! Network side of the WikiLeaders scraper.
//!
//! ## Leaders API
//!
//! - [`credential::CredentialManager`] - Acquires and validates the session cookie
//! - [`credential::CredentialHandle`] - Shared current credential, refreshed once when stale
//! - [`metadata::MetadataClient`] - Lists countries and their leaders
//! - [`client::ApiClient`] - Base URL, cookies and retry policy for API calls
//!
//! ## Pages
//!
//! - [`fetcher::DocumentFetcher`] - Bounded-concurrency page retrieval
//!
//! ## Host
//!
//! The [`host`] module holds the [`Transport`] seam and its reqwest
//! implementation. The `test-util` feature adds a scripted mock transport.
//!
//! ## Example
//!
//! ```ignore
//! use wikileaders_fetch::{CredentialHandle, SessionContext};
//!
//! let ctx = SessionContext::new()?;
//! let credential = ctx.credential_manager().acquire().await?;
//! let countries = ctx.metadata_client().list_countries(&credential).await?;
//! let handle = CredentialHandle::new(credential);
//! let leaders = ctx.metadata_client().list_leaders(&countries[0], &handle).await?;
//! ```

// Core modules
pub mod client;
pub mod context;
pub mod credential;
pub mod error;
pub mod fetcher;
pub mod host;
pub mod metadata;
pub mod retry;

// Re-export key types at crate root

// Errors
pub use error::{FetchError, HttpError};

// Host APIs
pub use host::http::{Cookie, HttpClient, HttpRequest, HttpResponse, Transport};
#[cfg(any(test, feature = "test-util"))]
pub use host::mock::{MockReply, MockTransport};

// Session
pub use client::ApiClient;
pub use context::{DEFAULT_API_BASE_URL, FetchSettings, SessionContext, SessionContextBuilder};
pub use credential::{Credential, CredentialCheck, CredentialHandle, CredentialManager};
pub use fetcher::{DocumentFetcher, DocumentOutcome};
pub use metadata::{MetadataClient, parse_leaders};
pub use retry::{Backoff, RetryContext, RetryDecision, RetryPolicy, RetryPrompt};
