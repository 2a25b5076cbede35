//! # TQL - Abstract Syntax Tree
//!
//! This module defines the Abstract Syntax Tree (AST) for TQL, a small
//! embedded query language for filtering collections of domain objects by
//! textual predicates.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes (field predicates and boolean combinators)
//! - **[operators]** - Comparison operators
//! - **[literals]** - Typed literal operands
//!
//! ## Quick Start
//!
//! ```text
//! age > 30 and (status = 'active' or status is null)
//! ```
//!
//! This query matches objects whose `age` exceeds 30 and whose `status` is
//! either `'active'` or absent.
//!
//! ## Core Concepts
//!
//! ### Field paths
//!
//! Every leaf predicate names a dotted field path resolved against the
//! target object's shape:
//!
//! ```text
//! owner.address.city = 'Paris'
//! ```
//!
//! A path through a multi-valued field matches if *any* reached value
//! satisfies the predicate. The synthetic path `_class` names the runtime
//! type of the value:
//!
//! ```text
//! _class in ['Order', 'Invoice']
//! ```
//!
//! ### Predicates
//!
//! - Comparisons: `=`, `!=`, `<`, `>`, `<=`, `>=`
//! - Membership: `field in ['a', 'b']`
//! - Presence: `field is null`, `field is empty`
//! - Ranges: `field between [0, 10]` (open bounds: `]0, 10[`)
//! - Text: `field contains 'x'`, `field containsIgnoreCase 'x'`
//! - Patterns: `field ~ '^[A-Z]+$'`, `field complies 'Aaa9'`,
//!   `field wordComplies '[Word] [digit]'`
//!
//! ### Combinators
//!
//! `and`, `or` and `not(...)` combine predicates; parentheses group.
//!
//! ## Immutability
//!
//! Nodes are built once by the parser (or the [builder](crate::builder))
//! and never mutated. Interpreters walk the tree with exhaustive `match`
//! expressions; [`Expr::to_query_string`](expressions::Expr::to_query_string)
//! renders an equivalent textual form back.

pub mod expressions;
pub mod literals;
pub mod operators;
pub mod tokens;

pub use expressions::Expr;
pub use literals::Literal;
pub use operators::ComparisonOperator;
pub use tokens::Token;
