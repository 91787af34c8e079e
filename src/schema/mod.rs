//! Module for declaring table schemas and reconciling them with Arrow schemas.

pub mod adapt;
pub mod arrow_types;
pub mod metadata;
pub mod type_category;

// Re-export the main schema types for easier access
pub use adapt::{cast_arrow_table_to_schema, update_existing_schema};
pub use arrow_types::arrow_type_from_logical;
pub use metadata::{ColumnDescriptor, Metadata, SchemaSource};
pub use type_category::TypeCategory;
