use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("invalid timestamp in {column} for order {order_id}: '{value}'")]
    InvalidTimestamp {
        column: &'static str,
        order_id: String,
        value: String,
    },

    #[error("invalid number in {column} for order {order_id}: {value}")]
    InvalidNumber {
        column: &'static str,
        order_id: String,
        value: String,
    },

    #[error("column {column} has value type '{type_name}' with no storage mapping")]
    UnmappedType { column: String, type_name: String },

    #[error("no rows left to derive a table schema from")]
    EmptyTable,
}
