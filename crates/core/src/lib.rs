//! # ctgforge Core
//!
//! Pure business logic layer - no HTTP, no configuration files.
//!
//! This crate contains:
//! - The field registry and boolean expression model
//! - The query compiler (expression to request parameters)
//! - The transport port and the paginating search facade
//! - Flattening of raw study JSON and tabular/graph export
//!
//! ## Architecture Principles
//! - Only depends on `ctgforge-domain`
//! - All I/O goes through [`search::StudyTransport`]
//! - Pure, testable business logic
//!
//! ## Example
//!
//! ```rust
//! use ctgforge_core::query::{compile, Fields};
//!
//! let expr = Fields::CONDITION.eq("diabetes") & Fields::STATUS.in_(["RECRUITING", "COMPLETED"]);
//! let compiled = compile(Some(&expr)).unwrap();
//!
//! assert_eq!(compiled.get("query.cond"), Some("\"diabetes\""));
//! assert_eq!(compiled.get("filter.overallStatus"), Some("COMPLETED,RECRUITING"));
//! ```

pub mod export;
pub mod flatten;
pub mod query;
pub mod search;

pub use export::{to_property_graph, to_rows, PropertyGraph, TrialRow};
pub use flatten::flatten_core;
pub use query::{compile, CompiledQuery, Expr, Field, FieldKind, FieldSpec, Fields, QueryParams};
pub use search::{
    RawRecord, RecordStream, SearchOptions, SearchRequest, SearchService, StudyStream,
    StudyTransport,
};
