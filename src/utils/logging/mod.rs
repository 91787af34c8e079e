//! Logging utilities for cast operations and console output

pub mod console;
pub mod log;

// Re-export commonly used functions for convenience
pub use console::{print_batch_summary, print_schema_info};
pub use log::{log_operation_complete, log_operation_start, log_warning};
