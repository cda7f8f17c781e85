//! Shared test helpers for `ctgforge-core` integration tests.
//!
//! Provides an in-memory transport so facade behaviour can be exercised
//! without a network.

pub mod transport;
