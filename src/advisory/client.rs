//! Retrying chat-completions client.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{
    build_prompt, AdvisoryError, ChatMessage, ChatRequest, ChatResponse, ChatTransport,
    TransportError, TransportResponse,
};
use crate::config::{AdvisoryConfig, PromptStyle};
use crate::types::{Advisory, Verdict};

const STATUS_OK: u16 = 200;
const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Why an attempt should be repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryReason {
    RateLimited,
    Timeout,
}

impl RetryReason {
    fn exhausted(self, attempts: u32) -> AdvisoryError {
        match self {
            Self::RateLimited => AdvisoryError::RateLimited { attempts },
            Self::Timeout => AdvisoryError::TimedOut { attempts },
        }
    }
}

/// Classified result of a single attempt.
#[derive(Debug)]
enum AttemptOutcome {
    Success(String),
    Retry(RetryReason),
    Fail(AdvisoryError),
}

/// Attempt budget and backoff schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay after the first 429; doubled after each further one
    pub rate_limit_base_delay: Duration,
    /// Fixed delay after a timeout
    pub timeout_delay: Duration,
    /// Bound on each attempt
    pub request_timeout: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &AdvisoryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            rate_limit_base_delay: Duration::from_secs(config.rate_limit_base_delay_secs),
            timeout_delay: Duration::from_secs(config.timeout_retry_delay_secs),
            request_timeout: config.timeout(),
        }
    }

    /// Delay before the attempt following `attempt` (1-based).
    fn backoff(&self, reason: RetryReason, attempt: u32) -> Duration {
        match reason {
            RetryReason::RateLimited => {
                let factor = 1u32 << (attempt.saturating_sub(1)).min(16);
                self.rate_limit_base_delay.saturating_mul(factor)
            }
            RetryReason::Timeout => self.timeout_delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&AdvisoryConfig::default())
    }
}

/// Client for the external text-generation service.
#[derive(Clone)]
pub struct AdvisoryClient {
    transport: Arc<dyn ChatTransport>,
    policy: RetryPolicy,
    model: String,
    temperature: f64,
    max_tokens: Option<u32>,
    excerpt_chars: usize,
    prompt_style: PromptStyle,
}

impl AdvisoryClient {
    pub fn new(transport: Arc<dyn ChatTransport>, config: &AdvisoryConfig) -> Self {
        Self {
            transport,
            policy: RetryPolicy::from_config(config),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            excerpt_chars: config.excerpt_chars,
            prompt_style: config.prompt_style,
        }
    }

    pub fn build_request(&self, text: &str, verdict: &Verdict) -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::user(build_prompt(
                text,
                verdict,
                self.prompt_style,
                self.excerpt_chars,
            ))],
            model: self.model.clone(),
            stream: false,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Request an advisory for `verdict`, retrying transient failures.
    ///
    /// The generated content is returned verbatim.
    pub async fn advise(&self, text: &str, verdict: &Verdict) -> Result<Advisory, AdvisoryError> {
        let request = self.build_request(text, verdict);
        let mut attempt: u32 = 1;

        loop {
            let reason = match self.attempt(&request).await {
                AttemptOutcome::Success(content) => {
                    info!(attempt, "Advisory received from external service");
                    return Ok(Advisory::external(content));
                }
                AttemptOutcome::Fail(e) => {
                    warn!(attempt, error = %e, "Advisory request failed permanently");
                    return Err(e);
                }
                AttemptOutcome::Retry(reason) => reason,
            };

            if attempt >= self.policy.max_attempts {
                let err = reason.exhausted(attempt);
                warn!(attempts = attempt, error = %err, "Advisory retries exhausted");
                return Err(err);
            }

            let delay = self.policy.backoff(reason, attempt);
            warn!(
                attempt,
                max_attempts = self.policy.max_attempts,
                reason = ?reason,
                delay_secs = delay.as_secs_f64(),
                "Advisory attempt failed, backing off"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn attempt(&self, request: &ChatRequest) -> AttemptOutcome {
        let sent = tokio::time::timeout(self.policy.request_timeout, self.transport.send(request)).await;

        match sent {
            Err(_) | Ok(Err(TransportError::Timeout)) => AttemptOutcome::Retry(RetryReason::Timeout),
            Ok(Err(TransportError::Connection(msg))) => AttemptOutcome::Fail(AdvisoryError::Connection(msg)),
            Ok(Ok(response)) => Self::classify_response(response),
        }
    }

    fn classify_response(response: TransportResponse) -> AttemptOutcome {
        match response.status {
            STATUS_OK => match serde_json::from_str::<ChatResponse>(&response.body) {
                Ok(parsed) => match parsed.first_content() {
                    Some(content) => AttemptOutcome::Success(content),
                    None => AttemptOutcome::Fail(AdvisoryError::MalformedResponse(
                        "missing choices[0].message.content".to_string(),
                    )),
                },
                Err(e) => AttemptOutcome::Fail(AdvisoryError::MalformedResponse(e.to_string())),
            },
            STATUS_TOO_MANY_REQUESTS => {
                debug!("Advisory service rate limited the request");
                AttemptOutcome::Retry(RetryReason::RateLimited)
            }
            status => AttemptOutcome::Fail(AdvisoryError::Status {
                status,
                body: response.body,
            }),
        }
    }
}

impl std::fmt::Debug for AdvisoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdvisoryClient")
            .field("policy", &self.policy)
            .field("model", &self.model)
            .field("prompt_style", &self.prompt_style)
            .finish_non_exhaustive()
    }
}
