//! Search facade - compiles expressions and drives a [`StudyTransport`]

use std::sync::Arc;

use ctgforge_domain::constants::{DEFAULT_SEARCH_LIMIT, DEFAULT_SORT, MAX_SEARCH_LIMIT};
use ctgforge_domain::{CtgError, Result};
use futures::stream::BoxStream;
use futures::TryStreamExt;
use tracing::{debug, instrument, warn};

use super::ports::{RawRecord, SearchRequest, StudyTransport};
use crate::query::{compile, Expr, QueryParams};

/// Stream of raw records surfaced by the facade
pub type StudyStream<'a> = BoxStream<'a, Result<RawRecord>>;

/// Caller-facing options for [`SearchService::search`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub fields: Vec<String>,
    pub offset: usize,
    pub limit: usize,
    pub sort: String,
    /// Raw parameters applied after compilation; they win on key collisions
    pub extra_params: QueryParams,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            offset: 0,
            limit: DEFAULT_SEARCH_LIMIT,
            sort: DEFAULT_SORT.to_string(),
            extra_params: QueryParams::new(),
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Set the record limit (clamped to the API maximum at search time)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = sort.into();
        self
    }

    pub fn with_extra_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_params.insert(key, value);
        self
    }
}

/// Search facade over a study transport
///
/// The transport defaults to a trait object so tests and alternative
/// adapters can be swapped in; `ctgforge-infra` names the concrete HTTP
/// flavour.
pub struct SearchService<T: ?Sized = dyn StudyTransport> {
    transport: Arc<T>,
}

impl<T: ?Sized> Clone for SearchService<T> {
    fn clone(&self) -> Self {
        Self { transport: Arc::clone(&self.transport) }
    }
}

impl<T> SearchService<T>
where
    T: StudyTransport + ?Sized,
{
    /// Create a new search service
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    /// Release the service and hand back the transport
    pub fn into_transport(self) -> Arc<T> {
        self.transport
    }

    /// Fetch a single study by NCT identifier
    #[instrument(skip(self))]
    pub async fn get(&self, nct_id: &str) -> Result<RawRecord> {
        let nct_id = nct_id.trim();
        if nct_id.is_empty() {
            return Err(CtgError::InvalidInput("study identifier must not be empty".into()));
        }
        Ok(self.transport.fetch_one(nct_id).await?)
    }

    /// Count studies matching `expr`
    ///
    /// `extra_params` override compiled parameters with the same key.
    #[instrument(skip_all)]
    pub async fn count(&self, expr: Option<&Expr>, extra_params: &QueryParams) -> Result<u64> {
        let params = Self::build_params(expr, extra_params)?;
        let total = self.transport.count(&params).await?;
        debug!(total, "counted matching studies");
        Ok(total)
    }

    /// Stream studies matching `expr`
    ///
    /// Compilation errors are returned before any request is made. The
    /// limit is clamped to the API maximum.
    pub fn search(&self, expr: Option<&Expr>, options: SearchOptions) -> Result<StudyStream<'_>> {
        let params = Self::build_params(expr, &options.extra_params)?;

        let limit = if options.limit > MAX_SEARCH_LIMIT {
            warn!(requested = options.limit, max = MAX_SEARCH_LIMIT, "clamping search limit");
            MAX_SEARCH_LIMIT
        } else {
            options.limit
        };

        let request = SearchRequest {
            params,
            fields: options.fields,
            offset: options.offset,
            limit,
            sort: options.sort,
        };
        debug!(
            params = request.params.len(),
            offset = request.offset,
            limit = request.limit,
            "starting study search"
        );

        Ok(Box::pin(self.transport.search(request).map_err(CtgError::from)))
    }

    fn build_params(expr: Option<&Expr>, extra_params: &QueryParams) -> Result<QueryParams> {
        let mut params = compile(expr)?.into_params();
        params.merge(extra_params.iter());
        Ok(params)
    }
}
