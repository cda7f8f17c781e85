//! Concrete facade over the ClinicalTrials.gov transport

use std::sync::Arc;

use ctgforge_core::search::SearchService;
use ctgforge_domain::Result;
use tracing::{debug, info};

use super::transport::CtgTransport;
use crate::config::ClientConfig;

/// Search facade bound to the live API transport
pub type Ctg = SearchService<CtgTransport>;

/// Connect with a client-owned connection pool
///
/// # Errors
/// Returns `CtgError::Config` for invalid settings.
pub fn connect(config: &ClientConfig) -> Result<Ctg> {
    let transport = CtgTransport::new(config)?;
    info!(base_url = %config.base_url, page_size = config.page_size, "connected");
    Ok(SearchService::new(Arc::new(transport)))
}

/// Connect over a caller-owned reqwest client
///
/// # Errors
/// Returns `CtgError::Config` for invalid settings.
pub fn connect_with_client(client: reqwest::Client, config: &ClientConfig) -> Result<Ctg> {
    let transport = CtgTransport::with_client(client, config)?;
    Ok(SearchService::new(Arc::new(transport)))
}

/// Release the facade's connection resources
///
/// Returns `false` while clones of the facade are still alive; the pool is
/// then released when the last clone drops.
pub fn close(ctg: Ctg) -> bool {
    match Arc::try_unwrap(ctg.into_transport()) {
        Ok(transport) => {
            transport.close();
            true
        }
        Err(_) => {
            debug!("facade still shared, deferring close");
            false
        }
    }
}
