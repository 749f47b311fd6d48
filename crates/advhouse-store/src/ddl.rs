//! Destination table provisioning.

use advhouse_core::TableLayout;
use advhouse_transform::TableSchema;

use crate::{ClickHouseClient, StoreError};

/// Builds the `CREATE TABLE IF NOT EXISTS` statement for `schema`.
///
/// The engine is `ReplacingMergeTree` versioned by the layout's update
/// field, so reloading an order with a newer run date replaces the old row
/// on merge.
///
/// # Errors
///
/// Returns [`StoreError::MissingColumn`] if the update field or any unique
/// field is not a column of `schema`.
pub fn create_table_sql(
    database: &str,
    table: &str,
    schema: &TableSchema,
    layout: &TableLayout,
) -> Result<String, StoreError> {
    for field in std::iter::once(&layout.update_field).chain(&layout.unique_fields) {
        if !schema.contains(field) {
            return Err(StoreError::MissingColumn(field.clone()));
        }
    }

    let columns = schema
        .columns
        .iter()
        .map(|c| format!("`{}` {}", c.name, c.clickhouse_type()))
        .collect::<Vec<_>>()
        .join(", ");

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {database}.{table} ({columns}) \
         ENGINE = ReplacingMergeTree({update}, ({order_by}), {granularity})",
        update = layout.update_field,
        order_by = layout.unique_fields.join(", "),
        granularity = layout.index_granularity,
    ))
}

/// Creates the destination table if it does not exist yet.
///
/// # Errors
///
/// Returns [`StoreError::MissingColumn`] from [`create_table_sql`], or any
/// transport or server error from the statement itself.
pub async fn provision_table(
    client: &ClickHouseClient,
    table: &str,
    schema: &TableSchema,
    layout: &TableLayout,
) -> Result<(), StoreError> {
    let sql = create_table_sql(client.database(), table, schema, layout)?;
    let body = client.execute(&sql).await?;

    if body.trim().is_empty() {
        tracing::info!(
            database = client.database(),
            table,
            "table check complete, no rows returned"
        );
    } else {
        tracing::debug!(table, response = body.trim(), "create table response");
    }
    Ok(())
}
