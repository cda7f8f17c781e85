//! Boolean search expressions
//!
//! Expressions are immutable trees built from field predicates with `&`,
//! `|` and `!`. They carry no request details; see
//! [`compile`](super::compile) for the translation into parameters.

use std::ops::{BitAnd, BitOr, Not};

use ctgforge_domain::impl_domain_enum_conversions;

use super::fields::FieldSpec;

/// Comparison operator of a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Contains,
    In,
}

impl_domain_enum_conversions!(Operator {
    Eq => "eq",
    Contains => "contains",
    In => "in",
});

/// Operator together with its operand
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    Eq(String),
    Contains(String),
    In(Vec<String>),
}

impl Predicate {
    pub fn operator(&self) -> Operator {
        match self {
            Self::Eq(_) => Operator::Eq,
            Self::Contains(_) => Operator::Contains,
            Self::In(_) => Operator::In,
        }
    }
}

/// A single predicate over one field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Term {
    field: FieldSpec,
    predicate: Predicate,
}

impl Term {
    pub fn new(field: FieldSpec, predicate: Predicate) -> Self {
        Self { field, predicate }
    }

    pub fn field(&self) -> &FieldSpec {
        &self.field
    }

    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }
}

/// Search expression tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Term(Term),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
}

impl Expr {
    /// Conjunction of `self` and `other`
    pub fn and(self, other: Expr) -> Expr {
        Expr::And(Box::new(self), Box::new(other))
    }

    /// Disjunction of `self` and `other`
    pub fn or(self, other: Expr) -> Expr {
        Expr::Or(Box::new(self), Box::new(other))
    }
}

impl BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        self.and(rhs)
    }
}

impl BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        self.or(rhs)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}
