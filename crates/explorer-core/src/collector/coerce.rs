//! Turning operator text into typed values

use openapi_schema::SchemaType;
use serde_json::{Number, Value};

/// Outcome of coercing operator text to a declared type
#[derive(Debug, Clone, PartialEq)]
pub enum Coercion {
    Typed(Value),
    /// Text did not parse as the declared type and is kept as given
    Fallback(Value),
}

impl Coercion {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Coercion::Fallback(_))
    }

    pub fn into_value(self) -> Value {
        match self {
            Coercion::Typed(value) | Coercion::Fallback(value) => value,
        }
    }
}

/// Coerce one scalar value
pub fn coerce(text: &str, schema_type: &SchemaType) -> Coercion {
    match schema_type {
        SchemaType::Integer => match parse_integer(text) {
            Some(value) => Coercion::Typed(value),
            None => Coercion::Fallback(Value::String(text.to_string())),
        },
        SchemaType::Number => match parse_number(text) {
            Some(value) => Coercion::Typed(value),
            None => Coercion::Fallback(Value::String(text.to_string())),
        },
        SchemaType::Boolean => Coercion::Typed(Value::Bool(matches!(
            text.trim().to_lowercase().as_str(),
            "true" | "1" | "yes"
        ))),
        _ => Coercion::Typed(Value::String(text.to_string())),
    }
}

/// Coerce comma-separated items.
///
/// Blank items are dropped. Numeric item types convert all items or none:
/// one bad item leaves the whole list as text.
pub fn coerce_list(text: &str, item_type: &SchemaType) -> Coercion {
    let items: Vec<&str> = text
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect();
    let as_text = || Value::Array(items.iter().map(|i| Value::String(i.to_string())).collect());

    let parse: fn(&str) -> Option<Value> = match item_type {
        SchemaType::Integer => parse_integer,
        SchemaType::Number => parse_number,
        _ => return Coercion::Typed(as_text()),
    };

    match items.iter().map(|&item| parse(item)).collect::<Option<Vec<_>>>() {
        Some(values) => Coercion::Typed(Value::Array(values)),
        None => Coercion::Fallback(as_text()),
    }
}

fn parse_integer(text: &str) -> Option<Value> {
    text.trim().parse::<i64>().ok().map(Value::from)
}

fn parse_number(text: &str) -> Option<Value> {
    let number = text.trim().parse::<f64>().ok()?;
    Number::from_f64(number).map(Value::Number)
}
