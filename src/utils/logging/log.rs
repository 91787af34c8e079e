//! Logging utilities
//!
//! This module provides standardized logging functions for cast operations.

/// Log an operation start with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `target` - Name of the table being operated on
pub fn log_operation_start(operation: &str, target: &str) {
    log::info!("{operation} {target}");
}

/// Log an operation completion with consistent format
///
/// # Arguments
/// * `operation` - Description of the operation
/// * `target` - Name of the table that was operated on
/// * `items` - Number of columns processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(
    operation: &str,
    target: &str,
    items: usize,
    elapsed: Option<std::time::Duration>,
) {
    if let Some(duration) = elapsed {
        log::info!("Successfully {operation} {items} columns of {target} in {duration:?}");
    } else {
        log::info!("Successfully {operation} {items} columns of {target}");
    }
}

/// Log a warning, optionally tied to a column
///
/// # Arguments
/// * `message` - Warning message
/// * `column` - Optional column the warning is about
pub fn log_warning(message: &str, column: Option<&str>) {
    if let Some(column) = column {
        log::warn!("{message} (column: {column})");
    } else {
        log::warn!("{message}");
    }
}
