//! Error types for sselane operations.
//!
//! Register operations are total and never fail. The fallible entry points
//! are the ones that accept runtime input a caller could get wrong: rounding
//! immediates and byte slices converted into registers.

use std::fmt;

/// Errors that can occur when building emulated operands from runtime input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SselaneError {
    /// A rounding-control immediate outside `0..=0x0F`.
    InvalidRoundingImmediate {
        /// The immediate that was supplied.
        imm: i32,
    },
    /// A byte slice whose length does not match the register width.
    LengthMismatch {
        /// Register width in bytes.
        expected: usize,
        /// Length of the slice that was supplied.
        actual: usize,
    },
    /// Input validation error.
    ValidationError {
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for SselaneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SselaneError::InvalidRoundingImmediate { imm } => write!(
                f,
                "Invalid rounding immediate: {imm:#x} (expected a value in 0x00..=0x0f)"
            ),
            SselaneError::LengthMismatch { expected, actual } => write!(
                f,
                "Register length mismatch: expected {expected} bytes, got {actual}"
            ),
            SselaneError::ValidationError { message } => {
                write!(f, "Validation error: {message}")
            }
        }
    }
}

impl std::error::Error for SselaneError {}

/// Result type alias for sselane operations.
pub type Result<T> = std::result::Result<T, SselaneError>;

/// Creates a rounding immediate error.
pub fn rounding_immediate_error(imm: i32) -> SselaneError {
    SselaneError::InvalidRoundingImmediate { imm }
}

/// Creates a length mismatch error.
pub fn length_error(expected: usize, actual: usize) -> SselaneError {
    SselaneError::LengthMismatch { expected, actual }
}

/// Creates a validation error.
pub fn validation_error(message: impl Into<String>) -> SselaneError {
    SselaneError::ValidationError {
        message: message.into(),
    }
}
