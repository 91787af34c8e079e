//! Utility modules for Arrow arrays and logging

pub mod arrow;
pub mod logging;
