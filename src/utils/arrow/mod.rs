//! Arrow data handling utilities

pub mod conversion;

pub use conversion::{arrow_array_to_utf8, to_string_array};
