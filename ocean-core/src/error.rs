//! Error types for ocean simulation.

use thiserror::Error;

/// Result type for ocean operations.
pub type Result<T> = std::result::Result<T, OceanError>;

/// Errors raised while building or feeding a simulation.
///
/// The propagation step itself cannot fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OceanError {
    /// Grid is too small to hold a full vertical derivative kernel.
    #[error("vertices_{axis} must be >= {min}, got {got}")]
    GridTooSmall { axis: char, got: usize, min: usize },

    /// A scalar that must be finite and positive was not.
    #[error("{name} must be finite and > 0, got {value}")]
    InvalidParameter { name: &'static str, value: f32 },

    /// An externally supplied field does not match the grid.
    #[error("{field} field has {got} cells, expected {expected}")]
    FieldSize {
        field: &'static str,
        got: usize,
        expected: usize,
    },
}
