//! Exit code constants for the chlog CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable patch file)
//! - 2: Validation failure (ChangeLog errors found in a patch)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or an unreadable input file.
pub const USER_ERROR: i32 = 1;

/// Validation failure: one or more patches carry ChangeLog errors.
pub const VALIDATION_FAILURE: i32 = 2;
