//! Compilation of parsed queries into executable predicates.
//!
//! [`PredicateCompiler`] turns an [`Expr`] into a [`Predicate`] over live
//! objects: every atom's field path is resolved to an accessor chain up
//! front (unresolvable paths fail the compilation, not the match), pattern
//! predicates are compiled to regexes, and matching walks the compiled tree.
//!
//! An atom is satisfied when *any* value reached through its accessor chain
//! satisfies the condition; a path through a collection therefore matches
//! if at least one element does. Null and absent values are ordinary data:
//! they satisfy `is null` and nothing else.

use std::cmp::Ordering;
use std::sync::Arc;

use regex::Regex;

use crate::accessor::{AccessorChain, ChainCache, EvalError};
use crate::ast::{ComparisonOperator, Expr, Literal};
use crate::pattern;
use crate::shape::{Record, Shape};
use crate::value::Value;

/// Compiles queries into predicates, caching resolved accessor chains per
/// `(shape, path)` so many queries against the same shape share work.
pub struct PredicateCompiler {
    chains: Arc<ChainCache>,
}

impl PredicateCompiler {
    pub fn new() -> Self {
        Self::with_cache(Arc::new(ChainCache::new()))
    }

    /// Use a shared chain cache, e.g. one owned by the application and
    /// handed to every compiler instance.
    pub fn with_cache(chains: Arc<ChainCache>) -> Self {
        PredicateCompiler { chains }
    }

    /// Compile a query against the shape its roots will have.
    ///
    /// # Examples
    ///
    /// ```
    /// use tql_lang::predicate::PredicateCompiler;
    /// use tql_lang::{parser, shape};
    /// use tql_lang::cli::convert::json_to_value;
    ///
    /// let expr = parser::parse("a.b = 'v'").unwrap();
    /// let predicate = PredicateCompiler::new().compile(&expr, &shape::JSON).unwrap();
    ///
    /// let doc = json_to_value(serde_json::json!({"a": {"b": "v"}}));
    /// assert!(predicate.matches_value(&doc).unwrap());
    /// ```
    pub fn compile(&self, expr: &Expr, shape: &'static Shape) -> Result<Predicate, EvalError> {
        Ok(Predicate {
            node: self.compile_node(expr, shape)?,
        })
    }

    fn compile_node(&self, expr: &Expr, shape: &'static Shape) -> Result<Node, EvalError> {
        match expr {
            Expr::And(children) => Ok(Node::And(self.compile_children(children, shape)?)),
            Expr::Or(children) => Ok(Node::Or(self.compile_children(children, shape)?)),
            Expr::Not(child) => Ok(Node::Not(Box::new(self.compile_node(child, shape)?))),
            Expr::Comparison { field, op, value } => Ok(Node::Compare {
                chain: self.chains.resolve(shape, field)?,
                op: *op,
                value: value.clone(),
            }),
            Expr::In { field, values } => Ok(Node::In {
                chain: self.chains.resolve(shape, field)?,
                values: values.clone(),
            }),
            Expr::IsNull { field } => Ok(Node::IsNull {
                chain: self.chains.resolve(shape, field)?,
            }),
            Expr::IsEmpty { field } => Ok(Node::IsEmpty {
                chain: self.chains.resolve(shape, field)?,
            }),
            Expr::Between {
                field,
                lower,
                upper,
                lower_open,
                upper_open,
            } => Ok(Node::Between {
                chain: self.chains.resolve(shape, field)?,
                lower: lower.clone(),
                upper: upper.clone(),
                lower_open: *lower_open,
                upper_open: *upper_open,
            }),
            Expr::Contains {
                field,
                value,
                case_sensitive,
            } => Ok(Node::Contains {
                chain: self.chains.resolve(shape, field)?,
                value: value.clone(),
                case_sensitive: *case_sensitive,
            }),
            Expr::Matches { field, regex } => Ok(Node::Matches {
                chain: self.chains.resolve(shape, field)?,
                // Full-string semantics, as in `field ~ '^[A-Z][a-z]*$'`.
                regex: compile_regex(&format!("^(?:{})$", regex), regex)?,
            }),
            Expr::Complies { field, pattern } => {
                let source = pattern::char_pattern_to_regex(pattern);
                Ok(Node::Matches {
                    chain: self.chains.resolve(shape, field)?,
                    regex: compile_regex(&source, pattern)?,
                })
            }
            Expr::WordComplies { field, pattern } => {
                let source = pattern::word_pattern_to_regex(pattern);
                Ok(Node::Matches {
                    chain: self.chains.resolve(shape, field)?,
                    regex: compile_regex(&source, pattern)?,
                })
            }
        }
    }

    fn compile_children(
        &self,
        children: &[Expr],
        shape: &'static Shape,
    ) -> Result<Vec<Node>, EvalError> {
        children
            .iter()
            .map(|child| self.compile_node(child, shape))
            .collect()
    }
}

impl Default for PredicateCompiler {
    fn default() -> Self {
        Self::new()
    }
}

fn compile_regex(source: &str, shown: &str) -> Result<Regex, EvalError> {
    Regex::new(source).map_err(|e| EvalError::Pattern {
        pattern: shown.to_string(),
        cause: e.to_string(),
    })
}

/// An executable predicate over a single root object.
///
/// Matching either returns a boolean or fails with a fatal
/// [`EvalError`]; it never mutates the evaluated object graph.
pub struct Predicate {
    node: Node,
}

impl Predicate {
    /// Match against a live domain object.
    pub fn matches(&self, root: &dyn Record) -> Result<bool, EvalError> {
        eval(&self.node, &Target::Record(root))
    }

    /// Match against an already-wrapped value root, e.g. a JSON document.
    pub fn matches_value(&self, root: &Value) -> Result<bool, EvalError> {
        eval(&self.node, &Target::Value(root))
    }
}

enum Node {
    And(Vec<Node>),
    Or(Vec<Node>),
    Not(Box<Node>),
    Compare {
        chain: Arc<AccessorChain>,
        op: ComparisonOperator,
        value: Literal,
    },
    In {
        chain: Arc<AccessorChain>,
        values: Vec<Literal>,
    },
    IsNull {
        chain: Arc<AccessorChain>,
    },
    IsEmpty {
        chain: Arc<AccessorChain>,
    },
    Between {
        chain: Arc<AccessorChain>,
        lower: Literal,
        upper: Literal,
        lower_open: bool,
        upper_open: bool,
    },
    Contains {
        chain: Arc<AccessorChain>,
        value: String,
        case_sensitive: bool,
    },
    Matches {
        chain: Arc<AccessorChain>,
        regex: Regex,
    },
}

enum Target<'a> {
    Record(&'a dyn Record),
    Value(&'a Value),
}

impl Target<'_> {
    fn values(&self, chain: &AccessorChain) -> Result<Vec<Value>, EvalError> {
        match self {
            Target::Record(root) => chain.values(*root),
            Target::Value(root) => chain.values_of(root),
        }
    }
}

// Children are pure, so short-circuiting is safe.
fn eval(node: &Node, root: &Target) -> Result<bool, EvalError> {
    match node {
        Node::And(children) => {
            for child in children {
                if !eval(child, root)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Node::Or(children) => {
            for child in children {
                if eval(child, root)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        Node::Not(child) => Ok(!eval(child, root)?),
        Node::Compare { chain, op, value } => {
            let resolved = root.values(chain)?;
            Ok(match op {
                ComparisonOperator::Eq => resolved.iter().any(|v| eq(v, value)),
                ComparisonOperator::Neq => {
                    resolved.iter().any(|v| !v.is_null() && !eq(v, value))
                }
                ComparisonOperator::Lt => any_ordered(&resolved, value, Ordering::is_lt),
                ComparisonOperator::Gt => any_ordered(&resolved, value, Ordering::is_gt),
                ComparisonOperator::Lte => any_ordered(&resolved, value, Ordering::is_le),
                ComparisonOperator::Gte => any_ordered(&resolved, value, Ordering::is_ge),
            })
        }
        Node::In { chain, values } => {
            let resolved = root.values(chain)?;
            Ok(resolved
                .iter()
                .any(|v| values.iter().any(|literal| eq(v, literal))))
        }
        Node::IsNull { chain } => {
            let resolved = root.values(chain)?;
            Ok(resolved.iter().all(Value::is_null))
        }
        Node::IsEmpty { chain } => {
            let resolved = root.values(chain)?;
            Ok(resolved.iter().any(is_empty))
        }
        Node::Between {
            chain,
            lower,
            upper,
            lower_open,
            upper_open,
        } => {
            let resolved = root.values(chain)?;
            let above = if *lower_open {
                any_ordered(&resolved, lower, Ordering::is_gt)
            } else {
                any_ordered(&resolved, lower, Ordering::is_ge)
            };
            let below = if *upper_open {
                any_ordered(&resolved, upper, Ordering::is_lt)
            } else {
                any_ordered(&resolved, upper, Ordering::is_le)
            };
            Ok(above && below)
        }
        Node::Contains {
            chain,
            value,
            case_sensitive,
        } => {
            let resolved = root.values(chain)?;
            Ok(resolved.iter().any(|v| match v.as_text() {
                Some(text) if *case_sensitive => text.contains(value),
                Some(text) => text.to_lowercase().contains(&value.to_lowercase()),
                None => false,
            }))
        }
        Node::Matches { chain, regex } => {
            let resolved = root.values(chain)?;
            Ok(resolved
                .iter()
                .any(|v| v.as_text().is_some_and(|text| regex.is_match(&text))))
        }
    }
}

/// Typed equality: numeric when both sides have a numeric form (so
/// `int = 10.0` matches an integer field of 10), case-insensitive textual
/// otherwise. Nulls and containers never equal a literal.
fn eq(value: &Value, literal: &Literal) -> bool {
    if let (Some(a), Some(b)) = (value.as_decimal(), literal.as_decimal()) {
        return a == b;
    }
    match value.as_text() {
        Some(text) => text.eq_ignore_ascii_case(&literal.text()),
        None => false,
    }
}

// Ordering is numeric-only; operands without a numeric form do not match.
fn any_ordered(resolved: &[Value], literal: &Literal, accept: fn(Ordering) -> bool) -> bool {
    let Some(bound) = literal.as_decimal() else {
        return false;
    };
    resolved
        .iter()
        .any(|v| v.as_decimal().is_some_and(|d| accept(d.cmp(&bound))))
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::List(items) => items.is_empty(),
        Value::Map(entries) => entries.is_empty(),
        _ => false,
    }
}
