//! Cross-cutting error types for the report exporter.
//!
//! Crate-specific failures (`SinkError`, `ExportError`) live in their own
//! crates. `CoreError` covers problems with the analysis model itself.

use thiserror::Error;

/// Errors raised while constructing or checking the analysis model.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (shape, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
