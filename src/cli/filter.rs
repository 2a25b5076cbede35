use crate::cli::CliError;
use crate::cli::convert::json_to_value;
use crate::parser;
use crate::predicate::PredicateCompiler;
use crate::shape;

pub struct FilterOptions {
    /// The TQL query to filter with
    pub query: String,
    /// The JSON document text
    pub input: Option<String>,
}

/// Filter a JSON document with a TQL query.
///
/// A top-level array filters its elements, each element being a root; any
/// other document is kept as a whole if it matches, or replaced by null.
pub fn execute_filter(options: &FilterOptions) -> Result<serde_json::Value, CliError> {
    let expr = parser::parse(&options.query)?;
    let input = options.input.as_deref().ok_or(CliError::NoInput)?;
    let document: serde_json::Value = serde_json::from_str(input)?;

    let predicate = PredicateCompiler::new().compile(&expr, &shape::JSON)?;

    match document {
        serde_json::Value::Array(items) => {
            let mut kept = Vec::new();
            for item in items {
                if predicate.matches_value(&json_to_value(item.clone()))? {
                    kept.push(item);
                }
            }
            Ok(serde_json::Value::Array(kept))
        }
        other => {
            if predicate.matches_value(&json_to_value(other.clone()))? {
                Ok(other)
            } else {
                Ok(serde_json::Value::Null)
            }
        }
    }
}
