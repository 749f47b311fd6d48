//! Bulk insert of enriched orders.

use advhouse_transform::{ColumnSpec, EnrichedOrder, TableSchema, COLUMNS};
use serde_json::Value;

use crate::{ClickHouseClient, StoreError};

/// Insert column order: the index field first, then the rest of the schema
/// in its own order.
///
/// # Errors
///
/// Returns [`StoreError::MissingColumn`] if `index_field` is not part of
/// `schema`.
pub fn insert_columns<'a>(
    schema: &'a TableSchema,
    index_field: &str,
) -> Result<Vec<&'a ColumnSpec>, StoreError> {
    let index = schema
        .get(index_field)
        .ok_or_else(|| StoreError::MissingColumn(index_field.to_owned()))?;

    let mut columns = Vec::with_capacity(schema.len());
    columns.push(index);
    columns.extend(schema.columns.iter().filter(|c| c.name != index_field));
    Ok(columns)
}

#[must_use]
pub fn insert_sql(database: &str, table: &str, columns: &[&ColumnSpec]) -> String {
    let names = columns
        .iter()
        .map(|c| format!("`{}`", c.name))
        .collect::<Vec<_>>()
        .join(", ");
    format!("INSERT INTO {database}.{table} ({names}) FORMAT JSONCompactEachRow")
}

/// Encodes one row as a `JSONCompactEachRow` line (no trailing newline).
///
/// # Errors
///
/// Returns [`StoreError::MissingColumn`] for a column the rows do not carry,
/// or [`StoreError::Encode`] if serialisation fails.
pub fn encode_row(row: &EnrichedOrder, columns: &[&ColumnSpec]) -> Result<String, StoreError> {
    let cells = row.cells();
    let values = columns
        .iter()
        .map(|column| {
            let position = COLUMNS
                .iter()
                .position(|name| *name == column.name)
                .ok_or_else(|| StoreError::MissingColumn(column.name.clone()))?;
            Ok(cells[position].to_json(column.value_type))
        })
        .collect::<Result<Vec<Value>, StoreError>>()?;
    Ok(serde_json::to_string(&values)?)
}

/// Inserts `rows` in batches of `batch_size` and returns the number of rows
/// sent.
///
/// A failed batch aborts the load; earlier batches stay committed.
///
/// # Errors
///
/// Returns [`StoreError::MissingColumn`] if the index field or a schema
/// column is unknown, or any transport or server error from an insert.
pub async fn load_rows(
    client: &ClickHouseClient,
    table: &str,
    schema: &TableSchema,
    rows: &[EnrichedOrder],
    index_field: &str,
    batch_size: usize,
) -> Result<usize, StoreError> {
    let columns = insert_columns(schema, index_field)?;
    let sql = insert_sql(client.database(), table, &columns);
    let batch_size = batch_size.max(1);

    let mut inserted = 0usize;
    for (batch_no, chunk) in rows.chunks(batch_size).enumerate() {
        let mut body = String::new();
        for row in chunk {
            body.push_str(&encode_row(row, &columns)?);
            body.push('\n');
        }
        client.insert(&sql, body).await?;
        inserted += chunk.len();
        tracing::info!(
            table,
            batch = batch_no + 1,
            rows = chunk.len(),
            inserted,
            "inserted batch"
        );
    }

    Ok(inserted)
}
