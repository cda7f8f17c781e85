//! ClinicalTrials.gov v2 adapter
//!
//! [`CtgTransport`] implements the core `StudyTransport` port over the
//! retrying [`HttpClient`](crate::http::HttpClient); [`facade`] wires it
//! into a ready-to-use search service.

pub mod envelope;
pub mod facade;
pub mod transport;

pub use facade::{close, connect, connect_with_client, Ctg};
pub use transport::CtgTransport;
