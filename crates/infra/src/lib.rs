//! # ctgforge Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The retrying HTTP client (reqwest)
//! - The ClinicalTrials.gov v2 transport and facade constructors
//! - Configuration loading from files and environment variables
//! - Tracing subscriber setup for binaries and tests
//!
//! ## Architecture
//! - Implements traits defined in `ctgforge-core`
//! - Depends on `ctgforge-common`, `ctgforge-domain` and `ctgforge-core`
//! - Contains all "impure" code (network, filesystem, environment)
//!
//! ## Example
//! ```no_run
//! use ctgforge_core::{Fields, SearchOptions};
//! use ctgforge_infra::{config::ClientConfig, ctg};
//! use futures::TryStreamExt;
//!
//! # async fn run() -> ctgforge_domain::Result<()> {
//! let client = ctg::connect(&ClientConfig::default())?;
//! let expr = Fields::CONDITION.eq("breast cancer") & Fields::STATUS.eq("RECRUITING");
//!
//! let studies: Vec<_> =
//!     client.search(Some(&expr), SearchOptions::new().with_limit(10))?.try_collect().await?;
//! println!("{} studies", studies.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod ctg;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use config::ClientConfig;
pub use ctg::{connect, connect_with_client, Ctg, CtgTransport};
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, LogFormat};
