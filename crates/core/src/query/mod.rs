//! Typed search expressions and their compilation into request parameters

pub mod compiler;
pub mod expr;
pub mod fields;
pub mod params;

pub use compiler::{compile, CompiledQuery};
pub use expr::{Expr, Operator, Predicate, Term};
pub use fields::{Field, FieldKind, FieldSpec, Fields};
pub use params::QueryParams;
