//! ClinicalTrials.gov transport

use async_trait::async_trait;
use ctgforge_core::query::QueryParams;
use ctgforge_core::search::{paginate, Page, RawRecord, RecordStream, SearchRequest, StudyTransport};
use ctgforge_domain::constants::{
    PARAM_COUNT_TOTAL, PARAM_FIELDS, PARAM_PAGE_SIZE, PARAM_PAGE_TOKEN, PARAM_SORT, SEARCH_PATH,
    STUDY_PATH_PREFIX,
};
use ctgforge_domain::{Result, TransportError};
use tracing::{debug, instrument};

use super::envelope::{parse_page, total_count};
use crate::config::ClientConfig;
use crate::http::HttpClient;

/// Transport for the ClinicalTrials.gov v2 `/studies` endpoints
#[derive(Debug, Clone)]
pub struct CtgTransport {
    http: HttpClient,
    page_size: u32,
}

impl CtgTransport {
    /// Create a transport that owns its connection pool
    ///
    /// # Errors
    /// Returns `CtgError::Config` for invalid settings and
    /// `CtgError::Transport` if the HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = config.http_client_builder().build()?;
        Ok(Self::from_http(http, config.page_size))
    }

    /// Create a transport over a caller-owned reqwest client
    ///
    /// The client's own timeout and proxy settings apply; `config.timeout`
    /// is ignored. [`close`](Self::close) leaves the client untouched.
    ///
    /// # Errors
    /// Returns `CtgError::Config` for invalid settings.
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = config.http_client_builder().client(client).build()?;
        Ok(Self::from_http(http, config.page_size))
    }

    /// Wrap an already configured HTTP client
    pub fn from_http(http: HttpClient, page_size: u32) -> Self {
        Self { http, page_size: page_size.max(1) }
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Release the transport's connection resources
    pub fn close(self) {
        self.http.close();
    }

    async fn fetch_page(
        &self,
        mut params: QueryParams,
        token: Option<String>,
    ) -> std::result::Result<Page, TransportError> {
        let token = token.map(|token| {
            params.remove(PARAM_PAGE_TOKEN);
            urlencoding::encode(&token).into_owned()
        });
        let encoded: Vec<(&str, &str)> =
            token.as_deref().map(|token| (PARAM_PAGE_TOKEN, token)).into_iter().collect();
        let payload = self.http.get_json_with(SEARCH_PATH, &params, &encoded).await?;
        let page = parse_page(SEARCH_PATH, payload)?;
        debug!(
            records = page.records.len(),
            has_next = page.next_page_token.is_some(),
            "fetched search page"
        );
        Ok(page)
    }
}

#[async_trait]
impl StudyTransport for CtgTransport {
    #[instrument(skip(self))]
    async fn fetch_one(&self, nct_id: &str) -> std::result::Result<RawRecord, TransportError> {
        let path = format!("{STUDY_PATH_PREFIX}{}", urlencoding::encode(nct_id));
        self.http.get_json(&path, &QueryParams::new()).await
    }

    #[instrument(skip_all)]
    async fn count(&self, params: &QueryParams) -> std::result::Result<u64, TransportError> {
        let params = params.clone().with(PARAM_PAGE_SIZE, "1").with(PARAM_COUNT_TOTAL, "true");
        let payload = self.http.get_json(SEARCH_PATH, &params).await?;
        total_count(SEARCH_PATH, &payload)
    }

    fn search(&self, request: SearchRequest) -> RecordStream<'_> {
        let SearchRequest { mut params, fields, offset, limit, sort } = request;

        params.insert(PARAM_PAGE_SIZE, self.page_size.to_string());
        if !fields.is_empty() {
            params.insert(PARAM_FIELDS, fields.join(","));
        }
        params.insert(PARAM_SORT, sort);

        debug!(offset, limit, page_size = self.page_size, "starting paginated search");
        paginate(move |token| self.fetch_page(params.clone(), token), offset, limit)
    }
}
