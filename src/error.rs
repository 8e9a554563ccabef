//! Error types for the chlog CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error
//! messages. ChangeLog rule violations are *not* represented here: the
//! core accumulates those as data (see [`crate::email::CheckError`]);
//! this enum only covers the CLI surface.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for chlog operations.
///
/// Each variant maps to a specific exit code.
#[derive(Error, Debug)]
pub enum ChlogError {
    /// User provided invalid arguments or an unreadable input file.
    #[error("{0}")]
    UserError(String),

    /// One or more patches failed ChangeLog validation.
    #[error("validation failed: {0}")]
    ValidationError(String),
}

impl ChlogError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ChlogError::UserError(_) => exit_codes::USER_ERROR,
            ChlogError::ValidationError(_) => exit_codes::VALIDATION_FAILURE,
        }
    }
}

/// Result type alias for chlog operations.
pub type Result<T> = std::result::Result<T, ChlogError>;
