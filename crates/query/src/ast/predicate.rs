//! Predicate definitions for query filtering.

use super::aggregate::AggregateOp;
use super::string_match::StringMatch;
use alloc::vec::Vec;
use core::fmt;
use tessera_core::{FieldPath, Record, RefSet, Value};

/// Comparison operator for scalar predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }

    fn apply(self, left: &Value, right: &Value) -> bool {
        match self {
            CompareOp::Eq => left == right,
            CompareOp::Ne => left != right,
            CompareOp::Lt => left < right,
            CompareOp::Le => left <= right,
            CompareOp::Gt => left > right,
            CompareOp::Ge => left >= right,
        }
    }
}

/// A boolean expression over the fields of one entity's records.
///
/// `None` in an `Option<Predicate>` means "no restriction"; the explicit
/// always-false predicate is `Const(false)`.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// `field <op> value`.
    Compare {
        field: FieldPath,
        op: CompareOp,
        value: Value,
    },
    /// `field > lower AND field < upper`.
    Between {
        field: FieldPath,
        lower: Value,
        upper: Value,
    },
    /// String match on a text field.
    Text { field: FieldPath, matcher: StringMatch },
    /// Relationship cardinality against a set of related ids.
    Aggregate {
        field: FieldPath,
        op: AggregateOp,
        ids: RefSet,
    },
    /// Constant result independent of the record.
    Const(bool),
    /// Conjunction of the children.
    And(Vec<Predicate>),
}

impl Predicate {
    pub fn compare(field: FieldPath, op: CompareOp, value: impl Into<Value>) -> Self {
        Predicate::Compare {
            field,
            op,
            value: value.into(),
        }
    }

    pub fn equals(field: FieldPath, value: impl Into<Value>) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    pub fn between(field: FieldPath, lower: impl Into<Value>, upper: impl Into<Value>) -> Self {
        Predicate::Between {
            field,
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    pub fn text(field: FieldPath, matcher: StringMatch) -> Self {
        Predicate::Text { field, matcher }
    }

    /// Builds an aggregate predicate. An empty id set collapses to the
    /// operator's constant result.
    pub fn aggregate(field: FieldPath, op: AggregateOp, ids: RefSet) -> Self {
        if ids.is_empty() {
            return Predicate::Const(op.on_empty_set());
        }
        Predicate::Aggregate { field, op, ids }
    }

    /// Evaluates the predicate against a record.
    ///
    /// A field that is missing or holds `Null` never satisfies a comparison,
    /// range or string match. Aggregates treat `Null` as an empty collection.
    pub fn eval(&self, record: &Record) -> bool {
        match self {
            Predicate::Compare { field, op, value } => match present(field, record) {
                Some(v) => op.apply(v, value),
                None => false,
            },
            Predicate::Between {
                field,
                lower,
                upper,
            } => match present(field, record) {
                Some(v) => v > lower && v < upper,
                None => false,
            },
            Predicate::Text { field, matcher } => present(field, record)
                .and_then(Value::as_str)
                .is_some_and(|s| matcher.matches(s)),
            Predicate::Aggregate { field, op, ids } => {
                let value = field.get(record).unwrap_or(&Value::Null);
                op.eval(value, ids)
            }
            Predicate::Const(b) => *b,
            Predicate::And(children) => children.iter().all(|p| p.eval(record)),
        }
    }

    /// Returns the field paths referenced by this predicate.
    pub fn fields(&self) -> Vec<FieldPath> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields(&self, out: &mut Vec<FieldPath>) {
        match self {
            Predicate::Compare { field, .. }
            | Predicate::Between { field, .. }
            | Predicate::Text { field, .. }
            | Predicate::Aggregate { field, .. } => out.push(*field),
            Predicate::Const(_) => {}
            Predicate::And(children) => children.iter().for_each(|c| c.collect_fields(out)),
        }
    }
}

fn present<'a>(field: &FieldPath, record: &'a Record) -> Option<&'a Value> {
    field.get(record).filter(|v| !v.is_null())
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare { field, op, value } => {
                write!(f, "{} {} {}", field, op.symbol(), value)
            }
            Predicate::Between {
                field,
                lower,
                upper,
            } => write!(f, "{} > {} AND {} < {}", field, lower, field, upper),
            Predicate::Text { field, matcher } => write!(
                f,
                "{} {} {:?}",
                field,
                matcher.mode.operator(),
                matcher.candidate
            ),
            Predicate::Aggregate { field, op, ids } => {
                let set = Value::RefSet(ids.clone());
                write!(f, "SUBQUERY({}, $x, $x IN {}).@count ", field, set)?;
                match op {
                    AggregateOp::SomeMatching => f.write_str("> 0"),
                    AggregateOp::AllMatching => write!(f, "== {}", ids.len()),
                    AggregateOp::NoneMatching => f.write_str("== 0"),
                }
            }
            Predicate::Const(true) => f.write_str("TRUEPREDICATE"),
            Predicate::Const(false) => f.write_str("FALSEPREDICATE"),
            Predicate::And(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" AND ")?;
                    }
                    match child {
                        Predicate::And(_) | Predicate::Between { .. } => write!(f, "({})", child)?,
                        _ => write!(f, "{}", child)?,
                    }
                }
                Ok(())
            }
        }
    }
}
