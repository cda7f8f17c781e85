//! Study search: transport port, pagination and the caller-facing facade

pub mod pager;
pub mod ports;
pub mod service;

pub use pager::{paginate, Page};
pub use ports::{RawRecord, RecordStream, SearchRequest, StudyTransport};
pub use service::{SearchOptions, SearchService, StudyStream};
