//! Retry policies for API requests.
//!
//! A failed credential or metadata request is either retried on a backoff
//! schedule or handed to a [`RetryPrompt`] that asks the operator.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

// ============================================================================
// Backoff
// ============================================================================

/// Bounded retry schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backoff {
    /// Maximum number of attempts, the first one included.
    pub max_attempts: u32,
    /// Base delay between attempts.
    pub base_delay: Duration,
    /// Whether to use exponential backoff.
    pub exponential_backoff: bool,
    /// Maximum delay between attempts.
    pub max_delay: Duration,
}

impl Backoff {
    /// Creates a schedule with `max_attempts` attempts.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::from_secs(1),
            exponential_backoff: true,
            max_delay: Duration::from_secs(60),
        }
    }

    /// A single attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            exponential_backoff: false,
            max_delay: Duration::ZERO,
        }
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Enables or disables exponential backoff.
    pub fn with_exponential_backoff(mut self, enabled: bool) -> Self {
        self.exponential_backoff = enabled;
        self
    }

    /// Calculates the delay after a given failed attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = if self.exponential_backoff {
            self.base_delay
                .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
        } else {
            self.base_delay
        };

        delay.min(self.max_delay)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(3)
    }
}

// ============================================================================
// Prompt
// ============================================================================

/// What failed, handed to the retry decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryContext {
    /// Operation being retried (endpoint name).
    pub operation: String,
    /// Attempts made so far.
    pub attempt: u32,
    /// Last failure.
    pub reason: String,
}

/// Asks the operator whether to try again.
///
/// Called from a blocking thread, so implementations may read stdin.
pub trait RetryPrompt: Send + Sync {
    /// Returns true to retry.
    fn confirm_retry(&self, context: &RetryContext) -> bool;
}

// ============================================================================
// Policy
// ============================================================================

/// Outcome of a retry decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again after the given pause.
    RetryAfter(Duration),
    /// Stop and report the failure.
    GiveUp,
}

/// How failures of credential and metadata requests are retried.
#[derive(Clone)]
pub enum RetryPolicy {
    /// Bounded automatic retries.
    Attempts(Backoff),
    /// Ask the operator each time.
    Ask(Arc<dyn RetryPrompt>),
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self::Attempts(Backoff::no_retry())
    }

    /// A policy that asks `prompt`.
    pub fn ask(prompt: impl RetryPrompt + 'static) -> Self {
        Self::Ask(Arc::new(prompt))
    }

    /// Decides whether to retry after a failure.
    pub async fn decide(&self, context: RetryContext) -> RetryDecision {
        match self {
            Self::Attempts(backoff) => {
                if context.attempt < backoff.max_attempts {
                    RetryDecision::RetryAfter(backoff.delay_for_attempt(context.attempt))
                } else {
                    RetryDecision::GiveUp
                }
            }
            Self::Ask(prompt) => {
                let prompt = Arc::clone(prompt);
                let confirmed =
                    tokio::task::spawn_blocking(move || prompt.confirm_retry(&context))
                        .await
                        .unwrap_or(false);
                debug!(confirmed, "Operator answered retry prompt");
                if confirmed {
                    RetryDecision::RetryAfter(Duration::ZERO)
                } else {
                    RetryDecision::GiveUp
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::Attempts(Backoff::default())
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attempts(backoff) => f.debug_tuple("Attempts").field(backoff).finish(),
            Self::Ask(_) => f.write_str("Ask"),
        }
    }
}
