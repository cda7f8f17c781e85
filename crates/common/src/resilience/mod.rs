//! Resilience patterns for fault tolerance
//!
//! This module provides **generic, reusable** retry policy primitives:
//! capped exponential backoff, symmetric jitter, retryable-status
//! classification and `Retry-After` parsing.
//!
//! The primitives are deliberately I/O-free. Adapters (see
//! `ctgforge-infra`'s HTTP client) drive the loop and decide how to sleep.

pub mod retry;

// Re-export retry types
pub use retry::{
    parse_retry_after, parse_retry_after_at, ConfigError, RetryConfig, RetryDecision,
};
