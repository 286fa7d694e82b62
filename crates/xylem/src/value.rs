//! Coerced attribute values and the typecasting rules.

use std::sync::OnceLock;

use regex::Regex;
use xylem_dom::NodeId;

/// A coerced attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Explicit absence: empty text, or an optional attribute-child that is
    /// not present in the document.
    Absent,
    Int(i64),
    Float(f64),
    Text(String),
    /// A structured attribute-child (the child has element children of its
    /// own), stored unconverted.
    Node(NodeId),
}

impl Value {
    pub fn text(text: impl Into<String>) -> Value {
        Value::Text(text.into())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            Value::Node(n) => Some(*n),
            _ => None,
        }
    }
}

fn int_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?[0-9]+$").unwrap())
}

fn float_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?[0-9]*\.[0-9]+$").unwrap())
}

/// Coerce raw node text: empty or absent text becomes [`Value::Absent`],
/// integer- and decimal-shaped text becomes a number, anything else stays
/// the unmodified string. Typecasting never performs date or other
/// locale-sensitive parsing.
pub fn typecast(text: Option<&str>) -> Value {
    let Some(text) = text else {
        return Value::Absent;
    };
    if text.is_empty() {
        return Value::Absent;
    }
    if int_pattern().is_match(text) {
        return match text.parse::<i64>() {
            Ok(i) => Value::Int(i),
            // digits beyond the i64 range stay textual
            Err(_) => Value::Text(text.to_owned()),
        };
    }
    if float_pattern().is_match(text) {
        if let Ok(f) = text.parse::<f64>() {
            return Value::Float(f);
        }
    }
    Value::Text(text.to_owned())
}
