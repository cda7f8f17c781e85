//! Application constants
//!
//! Centralized location for ClinicalTrials.gov API constants used throughout
//! the workspace.

// Endpoints
pub const DEFAULT_BASE_URL: &str = "https://clinicaltrials.gov/api/v2";
pub const SEARCH_PATH: &str = "/studies";
pub const STUDY_PATH_PREFIX: &str = "/studies/";

// Client identity
pub const DEFAULT_USER_AGENT: &str = concat!(
    "ctgforge/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/ctgforge/ctgforge)"
);
pub const ACCEPT_JSON: &str = "application/json";

// Search request parameters
pub const PARAM_PAGE_SIZE: &str = "pageSize";
pub const PARAM_PAGE_TOKEN: &str = "pageToken";
pub const PARAM_FIELDS: &str = "fields";
pub const PARAM_SORT: &str = "sort";
pub const PARAM_COUNT_TOTAL: &str = "countTotal";

// Search response envelope
pub const RECORDS_KEY: &str = "studies";
pub const LEGACY_ENVELOPE_KEY: &str = "StudyFieldsResponse";
pub const LEGACY_RECORDS_KEY: &str = "StudyFields";
pub const NEXT_PAGE_TOKEN_KEY: &str = "nextPageToken";
pub const TOTAL_COUNT_KEY: &str = "totalCount";

// Paging and limits
pub const DEFAULT_SORT: &str = "LastUpdatePostDate";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_SEARCH_LIMIT: usize = 100;
pub const MAX_SEARCH_LIMIT: usize = 1000;
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

// Error reporting
pub const BODY_EXCERPT_LIMIT: usize = 300;
