//! Column-type inference for the destination table.
//!
//! Each column's generic type is inferred from the values it actually holds,
//! then translated to a ClickHouse type:
//!
//! | generic   | ClickHouse     |
//! |-----------|----------------|
//! | `text`    | `String`       |
//! | `date`    | `Date`         |
//! | `integer` | `UInt32`       |
//! | `float`   | `Decimal(9,2)` |
//!
//! A generic type with no entry is an error, never passed through.

use crate::cell::Cell;
use crate::enrich::{EnrichedOrder, COLUMNS};
use crate::error::TransformError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Date,
    Integer,
    Float,
}

impl ValueType {
    #[must_use]
    pub fn clickhouse_type(self) -> &'static str {
        match self {
            ValueType::Text => "String",
            ValueType::Date => "Date",
            ValueType::Integer => "UInt32",
            ValueType::Float => "Decimal(9,2)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub value_type: ValueType,
}

impl ColumnSpec {
    #[must_use]
    pub fn clickhouse_type(&self) -> &'static str {
        self.value_type.clickhouse_type()
    }
}

/// Ordered column list of the destination table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub columns: Vec<ColumnSpec>,
}

impl TableSchema {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Translates a generic type name to its [`ValueType`].
///
/// # Errors
///
/// Returns [`TransformError::UnmappedType`] for any name other than
/// `text`, `date`, `integer` or `float`.
pub fn map_type(column: &str, type_name: &str) -> Result<ValueType, TransformError> {
    match type_name {
        "text" => Ok(ValueType::Text),
        "date" => Ok(ValueType::Date),
        "integer" => Ok(ValueType::Integer),
        "float" => Ok(ValueType::Float),
        other => Err(TransformError::UnmappedType {
            column: column.to_owned(),
            type_name: other.to_owned(),
        }),
    }
}

/// Infers the destination schema from the enriched rows.
///
/// An integer column that also holds nulls is widened to float.
///
/// # Errors
///
/// - [`TransformError::EmptyTable`] if `rows` is empty.
/// - [`TransformError::UnmappedType`] if a column holds booleans or nested
///   JSON.
pub fn infer_schema(rows: &[EnrichedOrder]) -> Result<TableSchema, TransformError> {
    if rows.is_empty() {
        return Err(TransformError::EmptyTable);
    }

    let mut names: [Option<&'static str>; COLUMNS.len()] = [None; COLUMNS.len()];
    let mut has_null = [false; COLUMNS.len()];
    for row in rows {
        let cells = row.cells();
        for ((slot, null), cell) in names.iter_mut().zip(&mut has_null).zip(&cells) {
            *null |= cell.is_null();
            *slot = unify(*slot, cell);
        }
    }

    let columns = COLUMNS
        .iter()
        .zip(names)
        .zip(has_null)
        .map(|((column, name), null)| {
            // UInt32 has no null; a gap would load as 0.
            let name = match name {
                Some("integer") if null => "float",
                Some(name) => name,
                None => "text",
            };
            let value_type = map_type(column, name)?;
            Ok(ColumnSpec {
                name: (*column).to_owned(),
                value_type,
            })
        })
        .collect::<Result<Vec<_>, TransformError>>()?;

    tracing::debug!(columns = columns.len(), "inferred table schema");
    Ok(TableSchema { columns })
}

/// Widens the type seen so far by one more cell.
///
/// Nulls carry no type. Integers widen to floats, any other scalar mix
/// widens to text. Unmappable types stick so they surface as errors.
fn unify(seen: Option<&'static str>, cell: &Cell) -> Option<&'static str> {
    if cell.is_null() {
        return seen;
    }
    let next = cell.type_name();
    let Some(prev) = seen else {
        return Some(next);
    };

    let widened = match (prev, next) {
        (a, b) if a == b => a,
        ("boolean" | "nested", _) => prev,
        (_, "boolean" | "nested") => next,
        ("integer", "float") | ("float", "integer") => "float",
        _ => "text",
    };
    Some(widened)
}
