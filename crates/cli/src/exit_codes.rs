//! Process exit codes.
//! CI systems branch on these, so they are part of the public contract.

use mig3_core::Mig3Error;

/// Submission accepted, or dry run printed.
pub const SUCCESS: i32 = 0;
/// Bad report, missing revision, I/O or transport failure.
pub const FAILURE: i32 = 1;
/// Missing or invalid flag.
pub const USAGE: i32 = 2;
/// Service answered 409 Conflict.
pub const REGRESSION: i32 = 3;
/// Service answered anything but 201 or 409.
pub const REQUEST_ERROR: i32 = 4;

/// Exit code for a failed pipeline step.
pub fn for_error(error: &Mig3Error) -> i32 {
    match error {
        Mig3Error::Regression(_) => REGRESSION,
        Mig3Error::RequestError { .. } => REQUEST_ERROR,
        _ => FAILURE,
    }
}
