//! Retry configuration and backoff computation for idempotent requests
//!
//! This module owns the *policy* half of a retry loop: how many attempts an
//! operation gets, which HTTP statuses count as transient, and how long to
//! wait between attempts. The *mechanism* (issuing requests, sleeping) lives
//! with the caller so the policy stays pure and easy to test.
//!
//! Delays follow capped exponential backoff with symmetric jitter:
//!
//! ```text
//! delay = min(backoff_cap, backoff_base * 2^attempt)
//! delay = max(0, delay ± jitter_fraction * delay)
//! ```
//!
//! A server-provided `Retry-After` hint replaces the computed delay (clamped
//! to `backoff_cap`) and is never jittered.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSecondsWithFrac};
use thiserror::Error;

/// Default number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 5;
/// Default base delay for exponential backoff.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_millis(600);
/// Default upper bound for any single delay.
pub const DEFAULT_BACKOFF_CAP: Duration = Duration::from_secs(15);
/// Default symmetric jitter fraction.
pub const DEFAULT_JITTER_FRACTION: f64 = 0.25;
/// Statuses treated as transient unless configured otherwise.
pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

// 2^31 already saturates any practical base delay
const MAX_BACKOFF_EXPONENT: u32 = 31;

/// Errors raised when a retry configuration is inconsistent
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("jitter_fraction must be within [0.0, 1.0], got {0}")]
    InvalidJitter(f64),

    #[error("backoff_base ({base:?}) cannot be greater than backoff_cap ({cap:?})")]
    BaseExceedsCap { base: Duration, cap: Duration },
}

/// Decision for whether to retry an operation
#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    /// Retry the operation after the given delay
    RetryAfter(Duration),
    /// Don't retry the operation
    Stop,
}

/// Configuration for retry behavior
///
/// Durations are (de)serialized as fractional seconds so configuration files
/// can say `backoff_base = 0.6`.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries allowed after the first attempt (total attempts = `max_retries + 1`)
    pub max_retries: u32,
    /// Base delay for exponential backoff
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub backoff_base: Duration,
    /// Upper bound for any single delay, including `Retry-After` hints
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    pub backoff_cap: Duration,
    /// Symmetric jitter applied to computed delays (`0.0` disables jitter)
    pub jitter_fraction: f64,
    /// HTTP statuses that trigger a retry instead of an immediate failure
    pub retryable_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
            backoff_cap: DEFAULT_BACKOFF_CAP,
            jitter_fraction: DEFAULT_JITTER_FRACTION,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.to_vec(),
        }
    }
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the base delay and cap for exponential backoff
    pub fn with_backoff(mut self, base: Duration, cap: Duration) -> Self {
        self.backoff_base = base;
        self.backoff_cap = cap;
        self
    }

    /// Set the jitter fraction (0.0 = no jitter, 1.0 = ±100%)
    pub fn with_jitter_fraction(mut self, fraction: f64) -> Self {
        self.jitter_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    pub fn with_retryable_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.retryable_status_codes = codes.into_iter().collect();
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the jitter fraction is outside `[0, 1]`
    /// or the base delay exceeds the cap.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.jitter_fraction) {
            return Err(ConfigError::InvalidJitter(self.jitter_fraction));
        }
        if self.backoff_base > self.backoff_cap {
            return Err(ConfigError::BaseExceedsCap {
                base: self.backoff_base,
                cap: self.backoff_cap,
            });
        }
        Ok(())
    }

    /// Total number of attempts including the first one
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Check whether a response status should be retried
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    /// Check whether another attempt may follow the given (0-based) attempt
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Calculate exponential delay without jitter
    pub fn exponential_delay(&self, attempt: u32) -> Duration {
        let multiplier = 2_u32.saturating_pow(attempt.min(MAX_BACKOFF_EXPONENT));
        self.backoff_base.saturating_mul(multiplier).min(self.backoff_cap)
    }
}

#[cfg(feature = "runtime")]
impl RetryConfig {
    /// Apply symmetric jitter to prevent thundering herd
    pub fn apply_jitter(&self, delay: Duration) -> Duration {
        use rand::Rng;

        if self.jitter_fraction <= 0.0 || delay.is_zero() {
            return delay;
        }

        let secs = delay.as_secs_f64();
        let spread = secs * self.jitter_fraction;
        let offset = rand::thread_rng().gen_range(-spread..=spread);

        Duration::try_from_secs_f64((secs + offset).max(0.0)).unwrap_or(delay)
    }

    /// Compute the wait before the attempt following `attempt` (0-based)
    ///
    /// Returns `None` once the attempt budget is spent; the caller terminates
    /// instead of sleeping.
    pub fn backoff_delay(&self, attempt: u32, retry_after: Option<Duration>) -> Option<Duration> {
        if !self.should_retry(attempt) {
            return None;
        }

        if let Some(hint) = retry_after {
            return Some(hint.min(self.backoff_cap));
        }

        Some(self.apply_jitter(self.exponential_delay(attempt)))
    }

    /// Turn the outcome of a failed attempt into a retry decision
    pub fn decide(&self, attempt: u32, retry_after: Option<Duration>) -> RetryDecision {
        match self.backoff_delay(attempt, retry_after) {
            Some(delay) => {
                tracing::debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    honored_retry_after = retry_after.is_some(),
                    "scheduling retry"
                );
                RetryDecision::RetryAfter(delay)
            }
            None => RetryDecision::Stop,
        }
    }
}

/// Parse a `Retry-After` header value
///
/// Accepts delta-seconds (fractional values allowed) and HTTP-dates. Dates in
/// the past yield a zero delay; anything unparseable yields `None`.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    parse_retry_after_at(value, chrono::Utc::now())
}

/// [`parse_retry_after`] against an explicit clock reading
pub fn parse_retry_after_at(value: &str, now: chrono::DateTime<chrono::Utc>) -> Option<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(secs) = value.parse::<f64>() {
        if !secs.is_finite() || secs < 0.0 {
            return None;
        }
        return Duration::try_from_secs_f64(secs).ok();
    }

    let when = chrono::DateTime::parse_from_rfc2822(value).ok()?;
    let delta = when.with_timezone(&chrono::Utc) - now;
    Some(delta.to_std().unwrap_or(Duration::ZERO))
}
