//! Accessor resolution and chain evaluation.
//!
//! A dotted field path like `owner.address.city` is resolved once against a
//! root [`Shape`] into an [`AccessorChain`]: one reusable step per segment.
//! Evaluating the chain folds it left to right over a *set* of candidate
//! values, so a path through a multi-valued field fans out into every
//! reached value, and a predicate over the path means "does any reached
//! value satisfy it".
//!
//! Resolution depends only on the declared shape and the path text, never
//! on a live object, so chains are cached per `(shape, path)` pair by
//! [`ChainCache`] and shared across every evaluation of that shape.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::shape::{AccessorDef, Record, Shape, ShapeKind};
use crate::value::Value;

/// Fatal evaluation errors.
///
/// Both variants signal a schema mismatch between the query and the target
/// shape, never ordinary data conditions: absent and null values flow
/// through evaluation as data and are matched by `is null`.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// No accessor, map lookup or name tag matched a path segment
    UnresolvableField { path: String, shape: &'static str },

    /// A resolved accessor failed when invoked against a live value
    Extraction { path: String, cause: String },

    /// A regex or compliance pattern did not compile
    Pattern { pattern: String, cause: String },
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnresolvableField { path, shape } => {
                write!(f, "Unresolvable field path '{}' on shape '{}'", path, shape)
            }
            EvalError::Extraction { path, cause } => {
                write!(f, "Unable to extract values for '{}': {}", path, cause)
            }
            EvalError::Pattern { pattern, cause } => {
                write!(f, "Invalid pattern '{}': {}", pattern, cause)
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// One resolved, reusable step of an accessor chain.
pub enum Accessor {
    /// Invokes a single-valued accessor; yields exactly one value
    Unary(&'static AccessorDef),

    /// Invokes an accessor declared multi-valued; yields each element
    Iterable(&'static AccessorDef),

    /// Looks up a fixed key baked in at resolution time
    MapKey(String),

    /// Yields the runtime type of the candidate (first `_class` step)
    TypeOf,

    /// Yields a type's display name (second `_class` step)
    TypeName,
}

impl PartialEq for Accessor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Accessor::Unary(a), Accessor::Unary(b)) => std::ptr::eq(*a, *b),
            (Accessor::Iterable(a), Accessor::Iterable(b)) => std::ptr::eq(*a, *b),
            (Accessor::MapKey(a), Accessor::MapKey(b)) => a == b,
            (Accessor::TypeOf, Accessor::TypeOf) => true,
            (Accessor::TypeName, Accessor::TypeName) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Unary(def) => write!(f, "Unary({})", def.name),
            Accessor::Iterable(def) => write!(f, "Iterable({})", def.name),
            Accessor::MapKey(key) => write!(f, "MapKey({:?})", key),
            Accessor::TypeOf => write!(f, "TypeOf"),
            Accessor::TypeName => write!(f, "TypeName"),
        }
    }
}

/// The ordered accessor sequence for one field path on one root shape.
#[derive(Debug, PartialEq)]
pub struct AccessorChain {
    path: String,
    steps: Vec<Accessor>,
}

impl AccessorChain {
    /// Resolve a dotted field path against a root shape.
    ///
    /// Per segment: `_class` resolves to the runtime-type steps and is
    /// terminal; on a map-like shape the segment becomes a baked-in map
    /// key; otherwise the accessor candidates `get_<segment>`, `<segment>`
    /// and `is_<segment>` are tried in that order, then the shape's
    /// accessors are scanned for a matching external-name tag. Anything
    /// else fails with [`EvalError::UnresolvableField`].
    pub fn resolve(shape: &'static Shape, path: &str) -> Result<AccessorChain, EvalError> {
        let segments: Vec<&str> = path.split('.').collect();
        let mut steps = Vec::with_capacity(segments.len());
        let mut current = shape;

        for (index, segment) in segments.iter().enumerate() {
            if *segment == "_class" {
                steps.push(Accessor::TypeOf);
                steps.push(Accessor::TypeName);
                if index + 1 != segments.len() {
                    // The type name is a plain string; nothing resolves
                    // past it.
                    return Err(unresolvable(path, current));
                }
                break;
            }

            match &current.kind {
                ShapeKind::Map { value } => {
                    steps.push(Accessor::MapKey((*segment).to_string()));
                    current = *value;
                }
                _ => {
                    let def =
                        find_accessor(current, segment).ok_or_else(|| unresolvable(path, current))?;
                    match def.result.kind {
                        ShapeKind::List { element } => {
                            steps.push(Accessor::Iterable(def));
                            current = element;
                        }
                        _ => {
                            steps.push(Accessor::Unary(def));
                            current = def.result;
                        }
                    }
                }
            }
        }

        Ok(AccessorChain {
            path: path.to_string(),
            steps,
        })
    }

    /// The field path this chain was resolved from.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn steps(&self) -> &[Accessor] {
        &self.steps
    }

    /// Evaluate the chain against a single record root (the singleton
    /// candidate set of the root object).
    pub fn values(&self, root: &dyn Record) -> Result<Vec<Value>, EvalError> {
        let Some((first, rest)) = self.steps.split_first() else {
            return Ok(Vec::new());
        };

        let mut current = Vec::new();
        match first {
            Accessor::Unary(def) => push_unique(&mut current, self.invoke(def, root)?),
            Accessor::Iterable(def) => {
                let fetched = self.invoke(def, root)?;
                fan_out(&mut current, fetched);
            }
            Accessor::TypeOf => push_unique(&mut current, Value::Type(root.shape())),
            step => {
                return Err(self.extraction(format!(
                    "cannot apply {:?} to a record of shape '{}'",
                    step,
                    root.shape().name
                )));
            }
        }

        self.fold(rest, current)
    }

    /// Evaluate the chain against an already-wrapped root value, e.g. a
    /// JSON document converted to a [`Value::Map`].
    pub fn values_of(&self, root: &Value) -> Result<Vec<Value>, EvalError> {
        self.fold(&self.steps, vec![root.clone()])
    }

    fn fold(&self, steps: &[Accessor], mut current: Vec<Value>) -> Result<Vec<Value>, EvalError> {
        for step in steps {
            let mut next = Vec::new();
            for candidate in &current {
                self.apply(step, candidate, &mut next)?;
            }
            current = next;
        }
        Ok(current)
    }

    fn apply(&self, step: &Accessor, candidate: &Value, out: &mut Vec<Value>) -> Result<(), EvalError> {
        match step {
            Accessor::Unary(def) => match candidate {
                Value::Record(record) => {
                    push_unique(out, self.invoke(def, record.as_ref())?);
                    Ok(())
                }
                // Null is data: the rest of the path stays null.
                Value::Null => {
                    push_unique(out, Value::Null);
                    Ok(())
                }
                other => Err(self.cannot_invoke(def, other)),
            },
            Accessor::Iterable(def) => match candidate {
                Value::Record(record) => {
                    let fetched = self.invoke(def, record.as_ref())?;
                    fan_out(out, fetched);
                    Ok(())
                }
                // A null collection fans out to nothing.
                Value::Null => Ok(()),
                other => Err(self.cannot_invoke(def, other)),
            },
            Accessor::MapKey(key) => match candidate {
                Value::Map(entries) => {
                    match entries.get(key) {
                        Some(found) => fan_out(out, found.clone()),
                        // Absent keys are ordinary nulls, not errors.
                        None => push_unique(out, Value::Null),
                    }
                    Ok(())
                }
                Value::Null => {
                    push_unique(out, Value::Null);
                    Ok(())
                }
                other => Err(self.extraction(format!(
                    "cannot look up key '{}' on {}",
                    key,
                    other.runtime_shape().name
                ))),
            },
            Accessor::TypeOf => {
                push_unique(out, Value::Type(candidate.runtime_shape()));
                Ok(())
            }
            Accessor::TypeName => match candidate {
                Value::Type(shape) => {
                    push_unique(out, Value::String(shape.name.to_string()));
                    Ok(())
                }
                other => Err(self.extraction(format!(
                    "expected a type handle, got {}",
                    other.runtime_shape().name
                ))),
            },
        }
    }

    fn invoke(&self, def: &AccessorDef, target: &dyn Record) -> Result<Value, EvalError> {
        (def.get)(target).map_err(|cause| self.extraction(cause))
    }

    fn cannot_invoke(&self, def: &AccessorDef, candidate: &Value) -> EvalError {
        self.extraction(format!(
            "cannot invoke accessor '{}' on {}",
            def.name,
            candidate.runtime_shape().name
        ))
    }

    fn extraction(&self, cause: String) -> EvalError {
        EvalError::Extraction {
            path: self.path.clone(),
            cause,
        }
    }
}

fn unresolvable(path: &str, shape: &Shape) -> EvalError {
    EvalError::UnresolvableField {
        path: path.to_string(),
        shape: shape.name,
    }
}

// Candidate precedence: conventional getter first, then the bare name,
// then the boolean-style accessor, then the external-name tag fallback.
fn find_accessor(shape: &'static Shape, segment: &str) -> Option<&'static AccessorDef> {
    let candidates = [
        format!("get_{}", segment),
        (*segment).to_string(),
        format!("is_{}", segment),
    ];
    for name in &candidates {
        if let Some(def) = shape.accessor(name) {
            return Some(def);
        }
    }
    shape.tagged_accessor(segment)
}

// Multi-valued results flatten into the candidate set; everything else
// lands as a single value. Set semantics: duplicates collapse.
fn fan_out(out: &mut Vec<Value>, value: Value) {
    match value {
        Value::List(items) => {
            for item in items {
                push_unique(out, item);
            }
        }
        Value::Null => {}
        other => push_unique(out, other),
    }
}

fn push_unique(out: &mut Vec<Value>, value: Value) {
    if !out.contains(&value) {
        out.push(value);
    }
}

/// Caches resolved chains per `(root shape, field path)`.
///
/// Resolution is deterministic, so concurrent misses may resolve the same
/// chain twice but every caller gets the same stored result. The cache is
/// an explicit object owned by the compiler, shareable between compilers
/// via [`Arc`].
#[derive(Default)]
pub struct ChainCache {
    chains: RwLock<HashMap<(usize, String), Arc<AccessorChain>>>,
}

impl ChainCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self, shape: &'static Shape, path: &str) -> Result<Arc<AccessorChain>, EvalError> {
        let key = (shape as *const Shape as usize, path.to_string());

        {
            let chains = self.chains.read().unwrap_or_else(|e| e.into_inner());
            if let Some(chain) = chains.get(&key) {
                return Ok(Arc::clone(chain));
            }
        }

        let resolved = Arc::new(AccessorChain::resolve(shape, path)?);
        let mut chains = self.chains.write().unwrap_or_else(|e| e.into_inner());
        Ok(Arc::clone(chains.entry(key).or_insert(resolved)))
    }
}
