//! Expression compiler
//!
//! Compilation runs in three passes:
//!
//! 1. partition the tree by request parameter (the API ANDs parameters, so
//!    only `And` may span parameters)
//! 2. render each partition with its field kind's grammar
//! 3. replace spaces with `+` in every rendered value
//!
//! Partitions borrow from the input expression; nothing is cloned until the
//! rendered strings are produced.

use std::collections::BTreeSet;

use ctgforge_domain::CompileError;
use tracing::debug;

use super::expr::{Expr, Predicate, Term};
use super::fields::FieldKind;
use super::params::QueryParams;

/// Output of [`compile`]: encoded request parameters in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledQuery {
    params: QueryParams,
}

impl CompiledQuery {
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn into_params(self) -> QueryParams {
        self.params
    }

    pub fn get(&self, param: &str) -> Option<&str> {
        self.params.get(param)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Sub-expression restricted to one parameter
enum Group<'a> {
    Term(&'a Term),
    And(Box<Group<'a>>, Box<Group<'a>>),
    Or(Box<Group<'a>>, Box<Group<'a>>),
    Not(Box<Group<'a>>),
}

type Partition<'a> = Vec<(&'a str, Group<'a>)>;

/// Compile an expression into request parameters
///
/// `None` compiles to an empty parameter set. Errors are reported before
/// any output is produced.
///
/// # Errors
///
/// Returns a [`CompileError`] when an `Or`/`Not` spans parameters, a
/// combinator or operator is not expressible in a field kind's grammar, an
/// advanced filter has no area, or an `in_` list is empty.
pub fn compile(expr: Option<&Expr>) -> Result<CompiledQuery, CompileError> {
    let Some(expr) = expr else {
        return Ok(CompiledQuery::default());
    };

    let mut params = QueryParams::new();
    for (param, group) in partition(expr)? {
        let rendered = render(param, &group)?;
        params.insert(param, rendered.replace(' ', "+"));
    }

    debug!(params = params.len(), "compiled search expression");
    Ok(CompiledQuery { params })
}

fn partition(expr: &Expr) -> Result<Partition<'_>, CompileError> {
    match expr {
        Expr::Term(term) => Ok(vec![(term.field().param(), Group::Term(term))]),
        Expr::And(left, right) => {
            let mut right = partition(right)?;
            let mut merged = Vec::with_capacity(right.len() + 1);
            for (param, group) in partition(left)? {
                match right.iter().position(|(other, _)| *other == param) {
                    Some(idx) => {
                        let (_, other) = right.remove(idx);
                        merged.push((param, Group::And(Box::new(group), Box::new(other))));
                    }
                    None => merged.push((param, group)),
                }
            }
            merged.extend(right);
            Ok(merged)
        }
        Expr::Or(left, right) => {
            let mut left = partition(left)?;
            let mut right = partition(right)?;
            if left.len() != 1 || right.len() != 1 || left[0].0 != right[0].0 {
                return Err(CompileError::OrAcrossParameters {
                    left: param_names(&left),
                    right: param_names(&right),
                });
            }
            let (param, lhs) = left.remove(0);
            let (_, rhs) = right.remove(0);
            Ok(vec![(param, Group::Or(Box::new(lhs), Box::new(rhs)))])
        }
        Expr::Not(inner) => {
            let mut inner = partition(inner)?;
            if inner.len() != 1 {
                return Err(CompileError::NotAcrossParameters { params: param_names(&inner) });
            }
            let (param, group) = inner.remove(0);
            Ok(vec![(param, Group::Not(Box::new(group)))])
        }
    }
}

fn param_names(partition: &Partition<'_>) -> Vec<String> {
    partition.iter().map(|(param, _)| (*param).to_string()).collect()
}

fn render(param: &str, group: &Group<'_>) -> Result<String, CompileError> {
    let mut kinds = Vec::new();
    collect_kinds(group, &mut kinds);
    let kind = match kinds.as_slice() {
        [kind] => *kind,
        _ => {
            return Err(CompileError::MixedKinds {
                param: param.to_string(),
                kinds: kinds.iter().map(ToString::to_string).collect(),
            })
        }
    };

    match kind {
        FieldKind::Query => render_query(group),
        FieldKind::FilterList => {
            let mut values = BTreeSet::new();
            collect_list(param, group, &mut values)?;
            Ok(values.into_iter().collect::<Vec<_>>().join(","))
        }
        FieldKind::FilterAdvanced => {
            let mut clauses = Vec::new();
            collect_advanced(param, group, &mut clauses)?;
            Ok(clauses.join(" AND "))
        }
    }
}

fn collect_kinds(group: &Group<'_>, kinds: &mut Vec<FieldKind>) {
    match group {
        Group::Term(term) => {
            let kind = term.field().kind();
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Group::And(left, right) | Group::Or(left, right) => {
            collect_kinds(left, kinds);
            collect_kinds(right, kinds);
        }
        Group::Not(inner) => collect_kinds(inner, kinds),
    }
}

fn render_query(group: &Group<'_>) -> Result<String, CompileError> {
    Ok(match group {
        Group::Term(term) => match term.predicate() {
            Predicate::Eq(value) => format!("\"{value}\""),
            Predicate::Contains(value) => format!("({value})"),
            Predicate::In(values) => {
                let quoted: Vec<String> =
                    non_empty(term, values)?.iter().map(|value| format!("\"{value}\"")).collect();
                format!("({})", quoted.join(" OR "))
            }
        },
        Group::And(left, right) => {
            format!("({}) AND ({})", render_query(left)?, render_query(right)?)
        }
        Group::Or(left, right) => {
            format!("({}) OR ({})", render_query(left)?, render_query(right)?)
        }
        Group::Not(inner) => format!("NOT ({})", render_query(inner)?),
    })
}

fn collect_list<'a>(
    param: &str,
    group: &Group<'a>,
    values: &mut BTreeSet<&'a str>,
) -> Result<(), CompileError> {
    match group {
        Group::Term(term) => {
            let term: &'a Term = *term;
            match term.predicate() {
                Predicate::Eq(value) => {
                    values.insert(value.as_str());
                }
                Predicate::In(list) => {
                    values.extend(non_empty(term, list)?.iter().map(String::as_str));
                }
                Predicate::Contains(_) => return Err(unsupported_operator(term)),
            }
            Ok(())
        }
        Group::And(left, right) => {
            collect_list(param, left, values)?;
            collect_list(param, right, values)
        }
        Group::Or(..) => Err(unsupported_combinator(param, FieldKind::FilterList, "OR")),
        Group::Not(_) => Err(unsupported_combinator(param, FieldKind::FilterList, "NOT")),
    }
}

fn collect_advanced(
    param: &str,
    group: &Group<'_>,
    clauses: &mut Vec<String>,
) -> Result<(), CompileError> {
    match group {
        Group::Term(term) => {
            let area = term
                .field()
                .area()
                .filter(|area| !area.is_empty())
                .ok_or_else(|| CompileError::MissingArea { field: term.field().key().to_string() })?;
            let clause = match term.predicate() {
                Predicate::Eq(value) => format!("AREA[{area}]{value}"),
                Predicate::In(list) => format!("AREA[{area}]({})", non_empty(term, list)?.join(" OR ")),
                Predicate::Contains(_) => return Err(unsupported_operator(term)),
            };
            clauses.push(clause);
            Ok(())
        }
        Group::And(left, right) => {
            collect_advanced(param, left, clauses)?;
            collect_advanced(param, right, clauses)
        }
        Group::Or(..) => Err(unsupported_combinator(param, FieldKind::FilterAdvanced, "OR")),
        Group::Not(_) => Err(unsupported_combinator(param, FieldKind::FilterAdvanced, "NOT")),
    }
}

fn non_empty<'v>(term: &Term, values: &'v [String]) -> Result<&'v [String], CompileError> {
    if values.is_empty() {
        return Err(CompileError::EmptyValueList { field: term.field().key().to_string() });
    }
    Ok(values)
}

fn unsupported_operator(term: &Term) -> CompileError {
    CompileError::UnsupportedOperator {
        field: term.field().key().to_string(),
        kind: term.field().kind().to_string(),
        op: term.predicate().operator().to_string(),
    }
}

fn unsupported_combinator(param: &str, kind: FieldKind, combinator: &'static str) -> CompileError {
    CompileError::UnsupportedCombinator {
        param: param.to_string(),
        kind: kind.to_string(),
        combinator,
    }
}
