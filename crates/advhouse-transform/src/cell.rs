//! Single values of the in-memory order table.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::schema::ValueType;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Text(String),
    Integer(i64),
    Float(Decimal),
    Date(NaiveDate),
    Boolean(bool),
    /// JSON array or object.
    Nested(Value),
}

impl Cell {
    /// Converts a raw JSON value, keeping its JSON type.
    ///
    /// Returns `None` for numbers that fit neither `i64` nor [`Decimal`].
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let cell = match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Boolean(*b),
            Value::String(s) => Cell::Text(s.clone()),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Integer(i),
                None => Cell::Float(parse_decimal(&n.to_string())?),
            },
            Value::Array(_) | Value::Object(_) => Cell::Nested(value.clone()),
        };
        Some(cell)
    }

    /// Generic type name used by the schema mapper.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Cell::Null => "null",
            Cell::Text(_) => "text",
            Cell::Integer(_) => "integer",
            Cell::Float(_) => "float",
            Cell::Date(_) => "date",
            Cell::Boolean(_) => "boolean",
            Cell::Nested(_) => "nested",
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Encodes the cell as JSON for a column of type `value_type`.
    ///
    /// Text columns stringify whatever they hold, so a column that mixes
    /// strings and numbers loads cleanly. Nulls stay null and take the
    /// column default on insert.
    #[must_use]
    pub fn to_json(&self, value_type: ValueType) -> Value {
        match (self, value_type) {
            (Cell::Null, _) => Value::Null,
            (Cell::Integer(i), ValueType::Integer | ValueType::Float) => Value::from(*i),
            (Cell::Float(d), ValueType::Float) => d.to_f64().map_or(Value::Null, Value::from),
            (Cell::Date(d), ValueType::Date) => Value::String(d.format("%Y-%m-%d").to_string()),
            (cell, _) => Value::String(cell.to_string()),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(d) => write!(f, "{d}"),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Boolean(b) => write!(f, "{b}"),
            Cell::Nested(v) => write!(f, "{v}"),
        }
    }
}

/// Parses plain (`"100.5"`) and scientific (`"1.5e-3"`) decimal notation.
pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}
