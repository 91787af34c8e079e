//! Console output utilities
//!
//! This module provides utilities for formatted console output.

use arrow::record_batch::RecordBatch;

/// Print summary information about a cast table
pub fn print_batch_summary(batch: &RecordBatch, elapsed: std::time::Duration) {
    eprintln!(
        "Cast {} rows x {} columns in {:?}",
        batch.num_rows(),
        batch.num_columns(),
        elapsed
    );
}

/// Print the schema of a table
pub fn print_schema_info(batch: &RecordBatch) {
    eprintln!("Schema:");
    for field in batch.schema().fields() {
        let nullable = if field.is_nullable() { "nullable" } else { "required" };
        eprintln!("  - {} ({}, {nullable})", field.name(), field.data_type());
    }
}
