//! Configuration values.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// A key to value mapping, as held by every store and returned by `all()`.
pub type ValueMap = HashMap<String, Value>;

/// A single configuration value.
///
/// Sources that read an external medium (environment, command line, JSON)
/// always produce [`Value::String`]. The typed variants only appear when a
/// caller stores them explicitly with `set` or `reset`.
///
/// # Examples
///
/// ```rust
/// use tiered_config::core::Value;
///
/// let port = Value::from(8080);
/// assert_eq!(port.as_i64(), Some(8080));
/// assert_eq!(port.to_string(), "8080");
///
/// let hosts = Value::from(vec!["a".to_string(), "b".to_string()]);
/// assert_eq!(hosts.to_string(), "a,b");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value.
    Boolean(bool),
    /// Signed integer value.
    Integer(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    String(String),
    /// List of text values.
    List(Vec<String>),
}

impl Value {
    /// Borrow the text of a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view; text is parsed.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Float view; integers widen and text is parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(i) => Some(*i as f64),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean view; the text `"true"` and `"false"` are accepted.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// List view; text is split on `,` the way flattened JSON arrays are joined.
    pub fn as_list(&self) -> Option<Vec<String>> {
        match self {
            Self::List(items) => Some(items.clone()),
            Self::String(s) if s.is_empty() => Some(Vec::new()),
            Self::String(s) => Some(s.split(',').map(str::to_string).collect()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{}", x),
            Self::String(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_is_present() {
        let value = Value::from("");
        assert_eq!(value.as_str(), Some(""));
        assert_eq!(value.as_list(), Some(Vec::new()));
    }

    #[test]
    fn test_text_views() {
        let value = Value::from("42");
        assert_eq!(value.as_i64(), Some(42));
        assert_eq!(value.as_f64(), Some(42.0));
        assert_eq!(value.as_bool(), None);
        assert_eq!(Value::from("true").as_bool(), Some(true));
        assert_eq!(
            Value::from("1,2,3").as_list(),
            Some(vec!["1".to_string(), "2".to_string(), "3".to_string()])
        );
    }

    #[test]
    fn test_typed_views_do_not_cross() {
        assert_eq!(Value::from(true).as_i64(), None);
        assert_eq!(Value::from(3).as_str(), None);
        assert_eq!(Value::from(3).as_f64(), Some(3.0));
    }

    #[test]
    fn test_serializes_without_variant_tags() {
        let json = serde_json::to_value(Value::from(vec!["x".to_string()])).unwrap();
        assert_eq!(json, serde_json::json!(["x"]));
        assert_eq!(serde_json::to_value(Value::from(7)).unwrap(), serde_json::json!(7));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(false).to_string(), "false");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(
            Value::from(vec!["x".to_string(), "y".to_string()]).to_string(),
            "x,y"
        );
    }
}
