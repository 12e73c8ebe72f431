//! Error handling.
//!
//! This module provides:
//! - Error type definitions for every layer of the library
//! - Categorization of API failures
//! - Retry strategy configuration
//!
//! Failures are split into:
//! - **Hard failures**: no usable result, returned as `Err`
//! - **Partial failures**: returned inside a successful result envelope
//! - **Tolerated failures**: per-day web property fetch errors that do not stop a walk

mod categorization;
mod types;

// Re-export public API
pub use categorization::{get_retry_strategy, is_retriable_error};
pub use types::{
    ApiError, ApiErrorKind, CenseyeError, CompileError, ConfigError, HistoryError,
    InitializationError,
};
