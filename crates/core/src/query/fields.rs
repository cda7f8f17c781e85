//! Field registry
//!
//! A [`FieldSpec`] says how one logical field is encoded in the request:
//! which query parameter it lands in and which encoding family renders it.
//! [`Fields`] is the built-in registry of searchable fields.

use std::borrow::Cow;

use ctgforge_domain::impl_domain_enum_conversions;

use super::expr::{Expr, Predicate, Term};

/// Encoding family of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free-text search expression (`query.*` parameters)
    Query,
    /// Comma-separated literal list (`filter.overallStatus` and friends)
    FilterList,
    /// `AREA[...]` clauses inside `filter.advanced`
    FilterAdvanced,
}

impl_domain_enum_conversions!(FieldKind {
    Query => "query",
    FilterList => "filter_list",
    FilterAdvanced => "filter_advanced",
});

/// How a logical field maps onto a request parameter
///
/// Only advanced filters carry a search area, so the area lives on that
/// variant alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldSpec {
    Query { key: Cow<'static, str>, param: Cow<'static, str> },
    FilterList { key: Cow<'static, str>, param: Cow<'static, str> },
    FilterAdvanced { key: Cow<'static, str>, param: Cow<'static, str>, area: Cow<'static, str> },
}

impl FieldSpec {
    /// Free-text field rendered into `param`
    pub fn query(key: impl Into<Cow<'static, str>>, param: impl Into<Cow<'static, str>>) -> Self {
        Self::Query { key: key.into(), param: param.into() }
    }

    /// Literal-list field rendered into `param`
    pub fn filter_list(
        key: impl Into<Cow<'static, str>>,
        param: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::FilterList { key: key.into(), param: param.into() }
    }

    /// Advanced-filter field searching `area`
    pub fn filter_advanced(
        key: impl Into<Cow<'static, str>>,
        param: impl Into<Cow<'static, str>>,
        area: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self::FilterAdvanced { key: key.into(), param: param.into(), area: area.into() }
    }

    /// Logical name of the field
    pub fn key(&self) -> &str {
        match self {
            Self::Query { key, .. }
            | Self::FilterList { key, .. }
            | Self::FilterAdvanced { key, .. } => key,
        }
    }

    /// Request parameter the field is rendered into
    pub fn param(&self) -> &str {
        match self {
            Self::Query { param, .. }
            | Self::FilterList { param, .. }
            | Self::FilterAdvanced { param, .. } => param,
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Query { .. } => FieldKind::Query,
            Self::FilterList { .. } => FieldKind::FilterList,
            Self::FilterAdvanced { .. } => FieldKind::FilterAdvanced,
        }
    }

    /// Search area for advanced filters
    pub fn area(&self) -> Option<&str> {
        match self {
            Self::FilterAdvanced { area, .. } => Some(area),
            Self::Query { .. } | Self::FilterList { .. } => None,
        }
    }
}

/// Typed handle used to build predicates over one field
#[derive(Debug, Clone)]
pub struct Field {
    spec: FieldSpec,
}

impl Field {
    pub const fn new(spec: FieldSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    /// Exact match on a single value
    pub fn eq(&self, value: impl Into<String>) -> Expr {
        self.term(Predicate::Eq(value.into()))
    }

    /// Free-text containment
    pub fn contains(&self, value: impl Into<String>) -> Expr {
        self.term(Predicate::Contains(value.into()))
    }

    /// Match any of the given values
    pub fn in_<I, V>(&self, values: I) -> Expr
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.term(Predicate::In(values.into_iter().map(Into::into).collect()))
    }

    fn term(&self, predicate: Predicate) -> Expr {
        Expr::Term(Term::new(self.spec.clone(), predicate))
    }
}

impl From<FieldSpec> for Field {
    fn from(spec: FieldSpec) -> Self {
        Self::new(spec)
    }
}

/// Built-in ClinicalTrials.gov search fields
pub struct Fields;

impl Fields {
    pub const CONDITION: Field = Field::new(FieldSpec::Query {
        key: Cow::Borrowed("condition"),
        param: Cow::Borrowed("query.cond"),
    });

    pub const SPONSOR: Field = Field::new(FieldSpec::Query {
        key: Cow::Borrowed("sponsor"),
        param: Cow::Borrowed("query.spons"),
    });

    pub const INTERVENTION: Field = Field::new(FieldSpec::Query {
        key: Cow::Borrowed("intervention"),
        param: Cow::Borrowed("query.intr"),
    });

    pub const TITLE: Field = Field::new(FieldSpec::Query {
        key: Cow::Borrowed("title"),
        param: Cow::Borrowed("query.titles"),
    });

    pub const STATUS: Field = Field::new(FieldSpec::FilterList {
        key: Cow::Borrowed("status"),
        param: Cow::Borrowed("filter.overallStatus"),
    });

    pub const PHASE: Field = Field::new(FieldSpec::FilterAdvanced {
        key: Cow::Borrowed("phase"),
        param: Cow::Borrowed("filter.advanced"),
        area: Cow::Borrowed("Phase"),
    });

    pub const DRUG: Field = Field::new(FieldSpec::FilterAdvanced {
        key: Cow::Borrowed("drug"),
        param: Cow::Borrowed("filter.advanced"),
        area: Cow::Borrowed("InterventionNameSearch"),
    });

    /// Every built-in field, in registry order
    pub fn all() -> [Field; 7] {
        [
            Self::CONDITION,
            Self::SPONSOR,
            Self::INTERVENTION,
            Self::TITLE,
            Self::STATUS,
            Self::PHASE,
            Self::DRUG,
        ]
    }

    /// Look up a built-in field by its logical key
    pub fn by_key(key: &str) -> Option<Field> {
        Self::all().into_iter().find(|field| field.spec().key() == key)
    }
}
