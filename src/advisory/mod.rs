//! Advisory Module
//!
//! Produces the guidance text that accompanies a verdict.
//!
//! ## Architecture
//!
//! - **AdvisoryClient**: chat-completions call with a bounded timeout and
//!   retry-with-backoff on rate limiting (429) and timeouts
//! - **ChatTransport**: the network seam; `HttpTransport` is the reqwest
//!   implementation, tests substitute scripted transports
//! - **FallbackAdvisor**: deterministic offline templates used whenever the
//!   client fails or is disabled
//!
//! A failure on this path never blocks delivery of the verdict.

mod client;
mod prompt;
mod templates;
mod transport;
mod wire;

pub use client::{AdvisoryClient, RetryPolicy};
pub use prompt::{build_prompt, excerpt};
pub use templates::FallbackAdvisor;
pub use transport::{ChatTransport, HttpTransport, TransportError, TransportResponse};
pub use wire::{ChatMessage, ChatRequest, ChatResponse};

/// Terminal failure of the advisory path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdvisoryError {
    #[error("advisory service still rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },
    #[error("advisory service timed out on all {attempts} attempts")]
    TimedOut { attempts: u32 },
    #[error("connection to advisory service failed: {0}")]
    Connection(String),
    #[error("advisory service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected advisory response: {0}")]
    MalformedResponse(String),
}

impl AdvisoryError {
    /// Whether the failure came from exhausting retries on a transient cause.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::TimedOut { .. })
    }

    /// Stable short code for logs and API diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::TimedOut { .. } => "TIMEOUT",
            Self::Connection(_) => "CONNECTION",
            Self::Status { .. } => "HTTP_STATUS",
            Self::MalformedResponse(_) => "MALFORMED_RESPONSE",
        }
    }
}
