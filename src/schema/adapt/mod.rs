//! Module for reconciling Arrow schemas and casting tables with Arrow's own kernels.

pub mod compatibility;
pub mod schema_compat;

// Re-export the main types and functions for easier access
pub use compatibility::{
    TypeCompatibility, check_type_compatibility, is_integer, is_numeric, is_temporal,
};
pub use schema_compat::{
    SchemaAdaptation, SchemaAdaptationIssue, SchemaCompatibilityReport,
    cast_arrow_table_to_schema, check_schema_compatibility, update_existing_schema,
};
