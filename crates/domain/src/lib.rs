//! # ctgforge Domain
//!
//! Domain types shared by every ctgforge crate.
//!
//! This crate contains:
//! - The error taxonomy (compilation vs. transport failures)
//! - ClinicalTrials.gov API constants
//! - Normalized trial records produced by flattening
//!
//! ## Architecture
//! - No dependencies on other ctgforge crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
