//! Domain types and models

pub mod trial;

pub use trial::{Agency, ArmGroup, Condition, DateStruct, Intervention, TrialCore};
