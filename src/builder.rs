//! Programmatic construction of queries.
//!
//! Builds the same [`Expr`] values the parser produces, for callers that
//! assemble predicates in code rather than from query text.
//!
//! # Examples
//!
//! ```
//! use tql_lang::builder::{and, eq, gt, is_null, or};
//! use tql_lang::parser;
//!
//! let built = and([
//!     gt("age", 30),
//!     or([eq("status", "active"), is_null("status")]),
//! ]);
//! let parsed = parser::parse("age > 30 and (status = 'active' or status is null)").unwrap();
//! assert_eq!(built, parsed);
//! ```

use crate::ast::{ComparisonOperator, Expr, Literal};

fn comparison(field: &str, op: ComparisonOperator, value: impl Into<Literal>) -> Expr {
    Expr::Comparison {
        field: field.to_string(),
        op,
        value: value.into(),
    }
}

pub fn eq(field: &str, value: impl Into<Literal>) -> Expr {
    comparison(field, ComparisonOperator::Eq, value)
}

pub fn neq(field: &str, value: impl Into<Literal>) -> Expr {
    comparison(field, ComparisonOperator::Neq, value)
}

pub fn lt(field: &str, value: impl Into<Literal>) -> Expr {
    comparison(field, ComparisonOperator::Lt, value)
}

pub fn gt(field: &str, value: impl Into<Literal>) -> Expr {
    comparison(field, ComparisonOperator::Gt, value)
}

pub fn lte(field: &str, value: impl Into<Literal>) -> Expr {
    comparison(field, ComparisonOperator::Lte, value)
}

pub fn gte(field: &str, value: impl Into<Literal>) -> Expr {
    comparison(field, ComparisonOperator::Gte, value)
}

pub fn is_in<I>(field: &str, values: I) -> Expr
where
    I: IntoIterator,
    I::Item: Into<Literal>,
{
    Expr::In {
        field: field.to_string(),
        values: values.into_iter().map(Into::into).collect(),
    }
}

pub fn is_null(field: &str) -> Expr {
    Expr::IsNull {
        field: field.to_string(),
    }
}

pub fn is_empty(field: &str) -> Expr {
    Expr::IsEmpty {
        field: field.to_string(),
    }
}

/// A closed-bounds range; open bounds are a parser-only spelling.
pub fn between(field: &str, lower: impl Into<Literal>, upper: impl Into<Literal>) -> Expr {
    Expr::Between {
        field: field.to_string(),
        lower: lower.into(),
        upper: upper.into(),
        lower_open: false,
        upper_open: false,
    }
}

pub fn contains(field: &str, value: &str) -> Expr {
    Expr::Contains {
        field: field.to_string(),
        value: value.to_string(),
        case_sensitive: true,
    }
}

pub fn contains_ignore_case(field: &str, value: &str) -> Expr {
    Expr::Contains {
        field: field.to_string(),
        value: value.to_string(),
        case_sensitive: false,
    }
}

pub fn matches(field: &str, regex: &str) -> Expr {
    Expr::Matches {
        field: field.to_string(),
        regex: regex.to_string(),
    }
}

pub fn complies(field: &str, pattern: &str) -> Expr {
    Expr::Complies {
        field: field.to_string(),
        pattern: pattern.to_string(),
    }
}

pub fn word_complies(field: &str, pattern: &str) -> Expr {
    Expr::WordComplies {
        field: field.to_string(),
        pattern: pattern.to_string(),
    }
}

pub fn and(children: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::And(children.into_iter().collect())
}

pub fn or(children: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Or(children.into_iter().collect())
}

pub fn not(child: Expr) -> Expr {
    Expr::Not(Box::new(child))
}
