//! A Rust library for casting loosely typed tables to a declared schema,
//! with configurable error tolerance per column.

pub mod cast;
pub mod config;
pub mod error;
pub mod schema;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{BoolMap, CastPolicy, ErrorPolicy, TimestampRepresentation};
pub use error::{CastError, Result};
pub use schema::{ColumnDescriptor, Metadata, SchemaSource, TypeCategory};

// Arrow types
pub use arrow::datatypes::Schema as ArrowSchema;
pub use arrow::record_batch::RecordBatch;

// Value-level casting
pub use cast::{cast_column_to_schema, cast_table_to_schema};

// Schema-level casting
pub use schema::{cast_arrow_table_to_schema, update_existing_schema};
