//! Error types used throughout ctgforge
//!
//! Two disjoint taxonomies: [`CompileError`] for deterministic input-shape
//! problems found while compiling an expression, and [`TransportError`] for
//! everything that can go wrong talking to the API. [`CtgError`] wraps both
//! for the facade.

use thiserror::Error;

use crate::constants::BODY_EXCERPT_LIMIT;

/// Boxed error used as the cause of a terminal transport failure
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while compiling a search expression into query parameters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("operator `{op}` is not supported for {kind} field `{field}`")]
    UnsupportedOperator { field: String, kind: String, op: String },

    #[error(
        "OR across different search parameters is not supported (left: {left:?}, right: {right:?}); \
         combine values within one field instead, e.g. `condition.in_([...])`"
    )]
    OrAcrossParameters { left: Vec<String>, right: Vec<String> },

    #[error("NOT across multiple parameters is not supported ({params:?})")]
    NotAcrossParameters { params: Vec<String> },

    #[error("{combinator} is not supported inside the {kind} parameter `{param}`")]
    UnsupportedCombinator { param: String, kind: String, combinator: &'static str },

    #[error("advanced filter field `{field}` has no search area")]
    MissingArea { field: String },

    #[error("parameter `{param}` mixes field kinds {kinds:?}")]
    MixedKinds { param: String, kinds: Vec<String> },

    #[error("field `{field}` was given an empty value list")]
    EmptyValueList { field: String },
}

/// A response whose status made the request fail
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("HTTP {status}: {body}")]
pub struct HttpStatusError {
    pub status: u16,
    pub body: String,
}

/// Categories of transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Non-2xx response outside the retry set
    NonRetryableHttp,
    /// Malformed JSON or a JSON value of the wrong shape
    Decoding,
    /// Every allowed attempt failed with a transient cause
    RetriesExhausted,
    /// The request could not be built or the client could not be created
    Request,
}

/// Transport operation errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {status} calling {path}: {body}")]
    Http { path: String, status: u16, body: String },

    #[error("Invalid JSON response from {path}: {message}")]
    Decoding { path: String, message: String },

    #[error("Exhausted retries calling {path} after {attempts} attempts: {source}")]
    RetriesExhausted {
        path: String,
        attempts: u32,
        last_status: Option<u16>,
        #[source]
        source: BoxedError,
    },

    #[error("Request error: {0}")]
    Request(String),
}

impl TransportError {
    /// Build an HTTP error, truncating the body to a short excerpt
    pub fn http(path: impl Into<String>, status: u16, body: &str) -> Self {
        Self::Http { path: path.into(), status, body: excerpt(body) }
    }

    /// Get the error category for this error
    pub fn kind(&self) -> TransportErrorKind {
        match self {
            Self::Http { .. } => TransportErrorKind::NonRetryableHttp,
            Self::Decoding { .. } => TransportErrorKind::Decoding,
            Self::RetriesExhausted { .. } => TransportErrorKind::RetriesExhausted,
            Self::Request(_) => TransportErrorKind::Request,
        }
    }

    /// HTTP status of the failing response, if a response was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::RetriesExhausted { last_status, .. } => *last_status,
            Self::Decoding { .. } | Self::Request(_) => None,
        }
    }
}

/// Truncate a response body to [`BODY_EXCERPT_LIMIT`] characters
pub fn excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_LIMIT) {
        Some((idx, _)) => body[..idx].to_string(),
        None => body.to_string(),
    }
}

/// Main error type for ctgforge
#[derive(Error, Debug)]
pub enum CtgError {
    #[error("Query compilation error: {0}")]
    Compile(#[from] CompileError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for ctgforge operations
pub type Result<T> = std::result::Result<T, CtgError>;
