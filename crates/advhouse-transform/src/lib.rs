//! Cleaning, enrichment and column-type inference for fetched orders.
//!
//! Everything here is a pure transformation over in-memory rows.

pub mod cell;
pub mod enrich;
pub mod error;
pub mod schema;

pub use cell::Cell;
pub use enrich::{enrich, final_commission, EnrichedOrder, EnrichmentRules, COLUMNS};
pub use error::TransformError;
pub use schema::{infer_schema, map_type, ColumnSpec, TableSchema, ValueType};
