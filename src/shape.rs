//! Shape introspection for predicate targets.
//!
//! A [`Shape`] is a static description of what a value looks like to the
//! accessor resolver: a record with named zero-argument accessors, a keyed
//! map, a list, or a scalar. Domain types implement [`Record`] and register
//! their accessors in a static table; resolution then works entirely on
//! declared shapes, never on live objects.
//!
//! ```
//! use tql_lang::shape::{self, AccessorDef, Record, Shape, ShapeKind};
//! use tql_lang::Value;
//!
//! struct Order {
//!     total: i64,
//! }
//!
//! static ORDER: Shape = Shape {
//!     name: "Order",
//!     kind: ShapeKind::Record {
//!         accessors: &[AccessorDef {
//!             name: "get_total",
//!             tag: None,
//!             result: &shape::INTEGER,
//!             get: |r| Ok(Value::Integer(shape::downcast::<Order>(r)?.total)),
//!         }],
//!     },
//! };
//!
//! impl Record for Order {
//!     fn shape(&self) -> &'static Shape {
//!         &ORDER
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;

use crate::value::Value;

/// A zero-argument accessor getter. The error string is the extraction
/// cause; the evaluator attaches the field path.
pub type Getter = fn(&dyn Record) -> Result<Value, String>;

/// A live object that can be evaluated against a predicate.
pub trait Record: Any {
    fn shape(&self) -> &'static Shape;
}

/// Recover the concrete type behind a `&dyn Record` inside a getter.
pub fn downcast<T: Record>(record: &dyn Record) -> Result<&T, String> {
    (record as &dyn Any)
        .downcast_ref::<T>()
        .ok_or_else(|| format!("value is not a {}", std::any::type_name::<T>()))
}

/// One registered accessor: its name, optional external/serialized-name tag
/// (the renaming mechanism the resolver falls back to), declared result
/// shape, and the getter itself.
pub struct AccessorDef {
    pub name: &'static str,
    pub tag: Option<&'static str>,
    pub result: &'static Shape,
    pub get: Getter,
}

impl fmt::Debug for AccessorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorDef")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("result", &self.result.name)
            .finish()
    }
}

/// What kind of value a shape describes.
pub enum ShapeKind {
    /// A comparable leaf value
    Scalar,

    /// An object with named accessors
    Record { accessors: &'static [AccessorDef] },

    /// A multi-valued container; accessors returning one fan out
    List { element: &'static Shape },

    /// A keyed container; path segments on it become map lookups
    Map { value: &'static Shape },

    /// Nothing is statically known; no path can resolve further
    Unknown,
}

/// A static type descriptor. Shapes are declared as `static` items so a
/// resolved chain can hold `&'static` references and be cached freely.
pub struct Shape {
    pub name: &'static str,
    pub kind: ShapeKind,
}

impl Shape {
    /// Look up a registered accessor by name.
    pub fn accessor(&'static self, name: &str) -> Option<&'static AccessorDef> {
        match &self.kind {
            ShapeKind::Record { accessors } => accessors.iter().find(|a| a.name == name),
            _ => None,
        }
    }

    /// Look up an accessor by its external/serialized-name tag. Scans in
    /// declaration order; first match wins.
    pub fn tagged_accessor(&'static self, tag: &str) -> Option<&'static AccessorDef> {
        match &self.kind {
            ShapeKind::Record { accessors } => accessors.iter().find(|a| a.tag == Some(tag)),
            _ => None,
        }
    }

    pub fn is_map(&self) -> bool {
        matches!(self.kind, ShapeKind::Map { .. })
    }
}

// The self-referential JSON shape would recurse forever under a derived
// Debug, so shapes print as their name only.
impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({})", self.name)
    }
}

/// Runtime shape of string values.
pub static STRING: Shape = Shape {
    name: "String",
    kind: ShapeKind::Scalar,
};

/// Runtime shape of integer values.
pub static INTEGER: Shape = Shape {
    name: "Integer",
    kind: ShapeKind::Scalar,
};

/// Runtime shape of floating-point values.
pub static FLOAT: Shape = Shape {
    name: "Float",
    kind: ShapeKind::Scalar,
};

/// Runtime shape of boolean values.
pub static BOOLEAN: Shape = Shape {
    name: "Boolean",
    kind: ShapeKind::Scalar,
};

/// Runtime shape of null values.
pub static NULL: Shape = Shape {
    name: "Null",
    kind: ShapeKind::Scalar,
};

/// Shape of a value nothing is known about, e.g. an untyped map entry.
pub static UNKNOWN: Shape = Shape {
    name: "Unknown",
    kind: ShapeKind::Unknown,
};

/// Runtime shape of bare lists.
pub static LIST: Shape = Shape {
    name: "List",
    kind: ShapeKind::List { element: &UNKNOWN },
};

/// Runtime shape of bare maps.
pub static MAP: Shape = Shape {
    name: "Map",
    kind: ShapeKind::Map { value: &UNKNOWN },
};

/// Runtime shape of type handles (the intermediate `_class` value).
pub static TYPE: Shape = Shape {
    name: "Type",
    kind: ShapeKind::Scalar,
};

/// Shape of an arbitrary JSON document: a map whose values are again JSON,
/// so dotted paths of any depth resolve to map lookups.
pub static JSON: Shape = Shape {
    name: "Json",
    kind: ShapeKind::Map { value: &JSON },
};
