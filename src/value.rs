//! The runtime value model: a closed tagged union of integers and text.

use std::cmp::Ordering;
use std::fmt;

/// A value stored in a variable or produced by an operation.
///
/// These are the only two runtime types. Coercion from text to integer happens
/// at one well-defined point, [`Value::coerced`], applied when operands are
/// resolved for arithmetic and conditions.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl Value {
    /// Applies the digit-string coercion rule: text consisting entirely of
    /// decimal digits becomes an integer. Everything else is returned as-is,
    /// including digit runs too long for an `i64`.
    pub fn coerced(self) -> Value {
        match self {
            Value::Text(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
                match s.parse::<i64>() {
                    Ok(n) => Value::Int(n),
                    Err(_) => Value::Text(s),
                }
            }
            v => v,
        }
    }

    /// Short type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "number",
            Value::Text(_) => "text",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Text(s) => write!(f, "{s}"),
        }
    }
}

impl PartialOrd for Value {
    /// Ordering is defined only between values of the same type: numeric for
    /// integers, lexicographic for text. Cross-type comparisons return `None`
    /// and surface as a type-mismatch diagnostic in the engine.
    fn partial_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Int(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Text(s.to_string())
    }
}
