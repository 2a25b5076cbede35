//! Static analysis over parsed queries.
//!
//! Walks a query without compiling or matching it: collect the field paths
//! it references, or validate that every path resolves against a shape.

use crate::accessor::{AccessorChain, EvalError};
use crate::ast::Expr;
use crate::shape::Shape;

/// The distinct field paths a query references, in first-appearance order.
pub fn field_paths(expr: &Expr) -> Vec<&str> {
    let mut out = Vec::new();
    collect(expr, &mut out);
    out
}

fn collect<'a>(expr: &'a Expr, out: &mut Vec<&'a str>) {
    match expr {
        Expr::And(children) | Expr::Or(children) => {
            for child in children {
                collect(child, out);
            }
        }
        Expr::Not(child) => collect(child, out),
        Expr::Comparison { field, .. }
        | Expr::In { field, .. }
        | Expr::IsNull { field }
        | Expr::IsEmpty { field }
        | Expr::Between { field, .. }
        | Expr::Contains { field, .. }
        | Expr::Matches { field, .. }
        | Expr::Complies { field, .. }
        | Expr::WordComplies { field, .. } => {
            if !out.contains(&field.as_str()) {
                out.push(field);
            }
        }
    }
}

/// Check that every field path in the query resolves against the shape,
/// reporting the first unresolvable one.
pub fn check(expr: &Expr, shape: &'static Shape) -> Result<(), EvalError> {
    for path in field_paths(expr) {
        AccessorChain::resolve(shape, path)?;
    }
    Ok(())
}
