//! Lenient, typed reads over a node's untyped `props` bag.
//!
//! Every accessor has a default so component decoders never fail: a wrong
//! type reads the same as an absent key.

use serde_json::{Map, Value};
use shared::UINode;

static EMPTY_PROPS: std::sync::LazyLock<Map<String, Value>> = std::sync::LazyLock::new(Map::new);

#[derive(Debug, Clone, Copy)]
pub struct Props<'a> {
    map: &'a Map<String, Value>,
    child_count: usize,
}

impl<'a> Props<'a> {
    pub fn of(node: &'a UINode) -> Self {
        Self {
            map: &node.props,
            child_count: node.children.len(),
        }
    }

    pub fn empty() -> Props<'static> {
        Props {
            map: &EMPTY_PROPS,
            child_count: 0,
        }
    }

    /// Number of children of the node being decoded.
    pub fn child_count(&self) -> usize {
        self.child_count
    }

    /// `null` reads as absent.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|value| !value.is_null())
    }

    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.text(key).unwrap_or_else(|| default.to_string())
    }

    /// Strings as-is, numbers and booleans in their JSON spelling.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_text)
    }

    pub fn f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(number)
    }

    pub fn f64_or(&self, key: &str, default: f64) -> f64 {
        self.f64(key).unwrap_or(default)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Bool(flag)) => *flag,
            _ => default,
        }
    }

    pub fn array(&self, key: &str) -> &'a [Value] {
        match self.get(key) {
            Some(Value::Array(items)) => items,
            _ => &[],
        }
    }

    /// Scalar items of an array prop; other items are skipped.
    pub fn string_list(&self, key: &str) -> Vec<String> {
        self.array(key).iter().filter_map(scalar_text).collect()
    }

    pub fn object(&self, key: &str) -> Option<&'a Map<String, Value>> {
        self.get(key).and_then(Value::as_object)
    }
}

/// JSON numbers and numeric strings; non-finite results are rejected.
pub fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_number(text),
        _ => None,
    }
    .filter(|number| number.is_finite())
}

/// Parses user-typed numeric text.
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|number| number.is_finite())
}

pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Human-readable rendering of any JSON value.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(number) => number
            .as_f64()
            .map(format_number)
            .unwrap_or_else(|| number.to_string()),
        other => other.to_string(),
    }
}

/// Whole numbers go out as JSON integers so `7.0` reaches the server as `7`.
pub fn number_value(number: f64) -> Value {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if number.fract() == 0.0 && number.abs() < MAX_EXACT {
        Value::from(number as i64)
    } else {
        serde_json::Number::from_f64(number)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

pub fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        format!("{number}")
    }
}
