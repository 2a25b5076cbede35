use std::fmt;

use crate::ast::literals::quote;
use crate::ast::{ComparisonOperator, Literal};

/// Abstract Syntax Tree node representing a parsed query.
///
/// Leaf variants are field predicates carrying a dotted field path;
/// `And`/`Or`/`Not` combine child nodes into a finite tree. Nodes are
/// immutable and structurally comparable: two nodes are equal iff they have
/// the same kind and equal fields, literals and (ordered) children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Field comparison against a single literal
    ///
    /// # Example
    /// ```text
    /// age > 30
    /// ```
    Comparison {
        field: String,
        op: ComparisonOperator,
        value: Literal,
    },

    /// Field value-set membership
    ///
    /// # Example
    /// ```text
    /// status in ['active', 'pending']
    /// ```
    In { field: String, values: Vec<Literal> },

    /// Field is absent or null
    IsNull { field: String },

    /// Field holds an empty string or container
    IsEmpty { field: String },

    /// Field lies between two bounds; each bound may be open
    ///
    /// # Examples
    /// ```text
    /// age between [18, 65]
    /// age between ]18, 65[
    /// ```
    Between {
        field: String,
        lower: Literal,
        upper: Literal,
        lower_open: bool,
        upper_open: bool,
    },

    /// Field contains a substring
    ///
    /// # Examples
    /// ```text
    /// name contains 'son'
    /// name containsIgnoreCase 'SON'
    /// ```
    Contains {
        field: String,
        value: String,
        case_sensitive: bool,
    },

    /// Field matches a regular expression (full match)
    ///
    /// # Example
    /// ```text
    /// name ~ '^[A-Z][a-z]*$'
    /// ```
    Matches { field: String, regex: String },

    /// Field complies with a char pattern (`a` lowercase letter,
    /// `A` uppercase letter, `9` digit, anything else literal)
    ///
    /// # Example
    /// ```text
    /// name complies 'Aaaa 9'
    /// ```
    Complies { field: String, pattern: String },

    /// Field complies with a word pattern built from bracketed tokens
    ///
    /// # Example
    /// ```text
    /// name wordComplies '[Word] [Word]'
    /// ```
    WordComplies { field: String, pattern: String },

    /// Logical conjunction of one or more children
    And(Vec<Expr>),

    /// Logical disjunction of one or more children
    Or(Vec<Expr>),

    /// Logical negation
    Not(Box<Expr>),
}

impl Expr {
    /// Render an equivalent textual form of this query.
    ///
    /// The rendering parses back to a structurally equal tree; it is not
    /// guaranteed to reproduce the original source text byte for byte.
    pub fn to_query_string(&self) -> String {
        match self {
            Expr::Comparison { field, op, value } => {
                format!("{} {} {}", field, op, value.to_query_string())
            }
            Expr::In { field, values } => {
                let rendered: Vec<String> = values.iter().map(Literal::to_query_string).collect();
                format!("{} in [{}]", field, rendered.join(", "))
            }
            Expr::IsNull { field } => format!("{} is null", field),
            Expr::IsEmpty { field } => format!("{} is empty", field),
            Expr::Between {
                field,
                lower,
                upper,
                lower_open,
                upper_open,
            } => format!(
                "{} between {}{}, {}{}",
                field,
                if *lower_open { ']' } else { '[' },
                lower.to_query_string(),
                upper.to_query_string(),
                if *upper_open { '[' } else { ']' },
            ),
            Expr::Contains {
                field,
                value,
                case_sensitive,
            } => {
                let keyword = if *case_sensitive {
                    "contains"
                } else {
                    "containsIgnoreCase"
                };
                format!("{} {} {}", field, keyword, quote(value))
            }
            Expr::Matches { field, regex } => format!("{} ~ {}", field, quote(regex)),
            Expr::Complies { field, pattern } => format!("{} complies {}", field, quote(pattern)),
            Expr::WordComplies { field, pattern } => {
                format!("{} wordComplies {}", field, quote(pattern))
            }
            Expr::And(children) => {
                let rendered: Vec<String> = children.iter().map(Self::render_operand).collect();
                rendered.join(" and ")
            }
            Expr::Or(children) => {
                let rendered: Vec<String> = children.iter().map(Self::render_operand).collect();
                rendered.join(" or ")
            }
            Expr::Not(child) => format!("not ({})", child.to_query_string()),
        }
    }

    // Composite operands need parentheses to survive reparsing with the
    // same grouping.
    fn render_operand(expr: &Expr) -> String {
        match expr {
            Expr::And(_) | Expr::Or(_) => format!("({})", expr.to_query_string()),
            _ => expr.to_query_string(),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}
