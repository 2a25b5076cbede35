use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// A typed literal operand of a field predicate.
///
/// Literals keep the static type the grammar assigned them; the comparator
/// uses it to pick numeric or textual comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Quoted string literal (`'active'`)
    Quoted(String),

    /// Integer literal (`42`)
    Int(i64),

    /// Decimal literal (`11.25`)
    Decimal(Decimal),

    /// Boolean literal (`true`, `false`)
    Boolean(bool),
}

impl Literal {
    /// The comparable string form of this literal.
    pub fn text(&self) -> String {
        match self {
            Literal::Quoted(s) => s.clone(),
            Literal::Int(n) => n.to_string(),
            Literal::Decimal(d) => d.to_string(),
            Literal::Boolean(b) => b.to_string(),
        }
    }

    /// The numeric form used by ordering operators, when the literal has one.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Literal::Quoted(s) => s.trim().parse().ok(),
            Literal::Int(n) => Some(Decimal::from(*n)),
            Literal::Decimal(d) => Some(*d),
            Literal::Boolean(_) => None,
        }
    }

    /// Render the literal the way the grammar spells it.
    pub fn to_query_string(&self) -> String {
        match self {
            Literal::Quoted(s) => quote(s),
            Literal::Int(n) => n.to_string(),
            Literal::Decimal(d) => d.to_string(),
            Literal::Boolean(b) => b.to_string(),
        }
    }
}

/// Single-quote and escape a string the way the lexer will read it back.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::Quoted(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::Quoted(s)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Int(n)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Decimal(Decimal::from_f64(n).unwrap_or_default())
    }
}

impl From<Decimal> for Literal {
    fn from(d: Decimal) -> Self {
        Literal::Decimal(d)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}
