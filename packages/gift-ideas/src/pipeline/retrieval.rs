//! Idea retrieval with retry, backoff, and a static fallback.
//!
//! The retry loop is an explicit state machine:
//!
//! ```text
//! Attempt ──ok──────────────────────────────▶ Done
//!    │ transient failure, attempts left
//!    ▼
//! Backoff ──sleep──▶ Attempt
//!
//! Attempt ──blocked / unconfigured / exhausted──▶ Fallback ──▶ Done
//! ```
//!
//! [`IdeaRetriever::retrieve`] cannot fail. Callers always get a non-empty
//! [`IdeaSet`] of at most `max_ideas` validated ideas.

use std::time::Duration;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::repair::{parse_completion, RepairError};
use crate::traits::completion::{Completion, CompletionProvider, ProviderError};
use crate::types::{FallbackReason, GiftIdea, IdeaSet, IdeaSource, MAX_IDEAS};
use crate::validate::validate_ideas;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Retry policy for idea retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalConfig {
    /// Total attempts, including the first
    pub max_retries: u32,
    /// Delay before the second attempt; doubles each time after
    pub base_delay: Duration,
    /// Upper bound on ideas returned
    pub max_ideas: usize,
    /// Scale each delay by a random factor in 0.75..=1.25
    pub jitter: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_ideas: MAX_IDEAS,
            jitter: false,
        }
    }
}

impl RetrievalConfig {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_max_ideas(mut self, max_ideas: usize) -> Self {
        self.max_ideas = max_ideas;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    fn attempt_limit(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// `max_ideas` clamped to `1..=MAX_IDEAS`.
    pub fn idea_limit(&self) -> usize {
        self.max_ideas.clamp(1, MAX_IDEAS)
    }
}

/// Why a single attempt produced no usable ideas. All of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptFailure {
    #[error("rate limited")]
    RateLimited,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("empty completion")]
    EmptyCompletion,

    #[error("malformed completion: {0}")]
    Malformed(String),

    #[error("no valid ideas in completion")]
    NoValidIdeas,
}

enum AttemptOutcome {
    Accepted(Vec<GiftIdea>),
    Retry(AttemptFailure),
    /// Give up without using the remaining attempts.
    Abort(FallbackReason),
}

/// Retry loop states. `attempt` is the zero-based attempt index.
enum State {
    Attempt(u32),
    Backoff { attempt: u32, failure: AttemptFailure },
    Fallback { attempts: u32, reason: FallbackReason },
    Done(IdeaSet),
}

/// Drives a [`CompletionProvider`] until it yields valid ideas.
pub struct IdeaRetriever<P> {
    provider: P,
    config: RetrievalConfig,
}

impl<P: CompletionProvider> IdeaRetriever<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config: RetrievalConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RetrievalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Retrieve ideas for `prompt`, falling back to [`fallback_ideas`].
    pub async fn retrieve(&self, prompt: &str) -> IdeaSet {
        let attempt_limit = self.config.attempt_limit();
        let mut state = State::Attempt(0);

        loop {
            state = match state {
                State::Attempt(attempt) => {
                    let attempts = attempt + 1;
                    match self.attempt(prompt, attempt).await {
                        AttemptOutcome::Accepted(ideas) => {
                            info!(attempts, count = ideas.len(), "Gift ideas generated");
                            State::Done(IdeaSet {
                                ideas,
                                source: IdeaSource::Generated { attempts },
                            })
                        }
                        AttemptOutcome::Abort(reason) => State::Fallback { attempts, reason },
                        AttemptOutcome::Retry(failure) if attempts < attempt_limit => {
                            State::Backoff { attempt, failure }
                        }
                        AttemptOutcome::Retry(failure) => State::Fallback {
                            attempts,
                            reason: FallbackReason::Exhausted {
                                last_failure: failure.to_string(),
                            },
                        },
                    }
                }
                State::Backoff { attempt, failure } => {
                    let delay = self.backoff_delay(attempt);
                    warn!(
                        attempt = attempt + 1,
                        error = %failure,
                        delay_ms = delay.as_millis() as u64,
                        "Idea generation failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    State::Attempt(attempt + 1)
                }
                State::Fallback { attempts, reason } => {
                    warn!(attempts, reason = ?reason, "Using fallback gift ideas");
                    let ideas = fallback_ideas()
                        .into_iter()
                        .take(self.config.idea_limit())
                        .collect();
                    State::Done(IdeaSet {
                        ideas,
                        source: IdeaSource::Fallback { attempts, reason },
                    })
                }
                State::Done(set) => return set,
            };
        }
    }

    async fn attempt(&self, prompt: &str, attempt: u32) -> AttemptOutcome {
        debug!(attempt = attempt + 1, "Requesting gift ideas");

        let completion = match self.provider.complete(prompt).await {
            Ok(completion) => completion,
            Err(ProviderError::Unconfigured(message)) => {
                return AttemptOutcome::Abort(FallbackReason::Unconfigured { message });
            }
            Err(ProviderError::RateLimited) => {
                return AttemptOutcome::Retry(AttemptFailure::RateLimited);
            }
            Err(ProviderError::Transport(message)) => {
                return AttemptOutcome::Retry(AttemptFailure::Transport(message));
            }
            Err(ProviderError::Api(message)) => {
                return AttemptOutcome::Retry(AttemptFailure::Provider(message));
            }
        };

        let text = match completion {
            Completion::Text(text) => text,
            Completion::Blocked { reason } => {
                return AttemptOutcome::Abort(FallbackReason::SafetyBlocked { reason });
            }
        };

        let value = match parse_completion(&text) {
            Ok(value) => value,
            Err(RepairError::Empty) => return AttemptOutcome::Retry(AttemptFailure::EmptyCompletion),
            Err(e) => return AttemptOutcome::Retry(AttemptFailure::Malformed(e.to_string())),
        };

        let mut ideas = validate_ideas(&value);
        if ideas.is_empty() {
            return AttemptOutcome::Retry(AttemptFailure::NoValidIdeas);
        }
        ideas.truncate(self.config.idea_limit());

        AttemptOutcome::Accepted(ideas)
    }

    /// `base_delay × 2^attempt`, optionally jittered.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let delay = self
            .config
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt));

        if self.config.jitter {
            let factor = rand::thread_rng().gen_range(0.75..=1.25);
            Duration::try_from_secs_f64(delay.as_secs_f64() * factor).unwrap_or(delay)
        } else {
            delay
        }
    }
}

const FALLBACK_IDEAS: [(&str, &str, &[&str]); 6] = [
    (
        "Experience Day Voucher",
        "A memorable day out they can book whenever suits them.",
        &["experience day voucher", "gift experience"],
    ),
    (
        "Personalised Photo Book",
        "Shared memories turned into a keepsake.",
        &["personalised photo book", "custom photo album"],
    ),
    (
        "Luxury Hamper",
        "A box of treats that suits almost any taste.",
        &["luxury food hamper", "gourmet gift box"],
    ),
    (
        "Cosy Blanket",
        "Something warm and comfortable for relaxing evenings.",
        &["soft fleece throw blanket", "sherpa blanket"],
    ),
    (
        "Bestselling Book",
        "A well-reviewed read to get lost in.",
        &["bestselling novel", "hardback book"],
    ),
    (
        "Scented Candle Set",
        "Adds a relaxing touch to any room.",
        &["scented candle set", "luxury candles"],
    ),
];

/// Generic ideas used when generation fails. Always six entries.
pub fn fallback_ideas() -> Vec<GiftIdea> {
    FALLBACK_IDEAS
        .iter()
        .filter_map(|(title, reason, keywords)| GiftIdea::new(title, reason, keywords.iter()))
        .collect()
}
