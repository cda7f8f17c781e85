//! Port interfaces for study retrieval
//!
//! These traits define the boundary between the search facade and the
//! HTTP adapter in `ctgforge-infra`.

use async_trait::async_trait;
use ctgforge_domain::constants::{DEFAULT_SEARCH_LIMIT, DEFAULT_SORT};
use ctgforge_domain::TransportError;
use futures::stream::BoxStream;

use crate::query::QueryParams;

/// Raw study record as returned by the API
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Lazy, single-pass sequence of raw records
pub type RecordStream<'a> = BoxStream<'a, Result<RawRecord, TransportError>>;

/// Parameters for one paginated search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Compiled expression plus caller overrides
    pub params: QueryParams,
    /// Projection of record fields; empty means the full record
    pub fields: Vec<String>,
    /// Records to skip client-side before yielding
    pub offset: usize,
    /// Maximum number of records to yield
    pub limit: usize,
    pub sort: String,
}

impl SearchRequest {
    pub fn new(params: QueryParams) -> Self {
        Self {
            params,
            fields: Vec::new(),
            offset: 0,
            limit: DEFAULT_SEARCH_LIMIT,
            sort: DEFAULT_SORT.to_string(),
        }
    }
}

/// Trait for fetching studies from a token-paginated search API
#[async_trait]
pub trait StudyTransport: Send + Sync {
    /// Fetch a single study by its identifier
    async fn fetch_one(&self, nct_id: &str) -> Result<RawRecord, TransportError>;

    /// Server-reported number of studies matching `params` (0 if absent)
    async fn count(&self, params: &QueryParams) -> Result<u64, TransportError>;

    /// Stream matching studies in server order
    ///
    /// Pages are fetched only as the stream is polled. Dropping the stream
    /// abandons the search and releases any in-flight request.
    fn search(&self, request: SearchRequest) -> RecordStream<'_>;
}
