//! Export of flattened trials
//!
//! Both exporters are pure functions over [`TrialCore`](ctgforge_domain::TrialCore)
//! slices; writing the result anywhere is left to the caller.

pub mod graph;
pub mod table;

pub use graph::{to_property_graph, GraphEdge, GraphNode, NodeLabel, PropertyGraph, Relation};
pub use table::{to_rows, TrialRow};
