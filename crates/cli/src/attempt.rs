//! Progress markers for pipeline steps.
//!
//! Every step prints `"<message>..."` before it runs and closes the line with
//! `OK` or `FAIL`. The closing marker is written by [`Attempt`]'s drop guard
//! when a step unwinds, so the line is never left open.

use crate::exit_codes;
use colored::Colorize;
use mig3_core::Mig3Error;
use std::fmt;
use std::io::Write;

/// A step that failed. Its FAIL marker has already been written.
#[derive(Debug)]
pub struct StepFailed {
    /// Process exit code for the failure.
    pub exit_code: i32,
    /// The underlying error.
    pub error: Mig3Error,
}

impl From<Mig3Error> for StepFailed {
    fn from(error: Mig3Error) -> Self {
        Self {
            exit_code: exit_codes::for_error(&error),
            error,
        }
    }
}

impl fmt::Display for StepFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error.kind(), self.error)
    }
}

impl std::error::Error for StepFailed {}

/// An open progress line.
pub struct Attempt<'a, W: Write + ?Sized> {
    out: &'a mut W,
    closed: bool,
}

impl<'a, W: Write + ?Sized> Attempt<'a, W> {
    /// Print the step message, without a newline.
    pub fn begin(out: &'a mut W, message: &str) -> Self {
        // Progress output is best effort; a closed stderr must not abort the run.
        let _ = write!(out, "{}...", message);
        let _ = out.flush();
        Self { out, closed: false }
    }

    /// Close the line with the success marker.
    pub fn succeed(mut self) {
        let _ = writeln!(self.out, "{}", "OK".green());
        self.closed = true;
    }

    /// Close the line with the failure marker and the error.
    pub fn fail(mut self, error: &Mig3Error) {
        let _ = writeln!(self.out, "{}", "FAIL".red());
        let _ = writeln!(self.out, "{}", format!("{}: {}", error.kind(), error).red());
        self.closed = true;
    }
}

impl<W: Write + ?Sized> Drop for Attempt<'_, W> {
    fn drop(&mut self) {
        if !self.closed {
            let _ = writeln!(self.out, "{}", "FAIL".red());
        }
    }
}

/// Colour mode for the progress markers, which go to stderr.
///
/// `colored` looks at stdout on its own, so the choice follows stderr unless
/// `NO_COLOR` or `CLICOLOR_FORCE` decide it (`None`).
pub fn progress_color(env_override: bool, stderr_is_terminal: bool) -> Option<bool> {
    if env_override {
        None
    } else {
        Some(stderr_is_terminal)
    }
}

/// Run `step` between a progress message and its closing marker.
pub fn log_attempt<T, W: Write + ?Sized>(
    out: &mut W,
    message: &str,
    step: impl FnOnce() -> mig3_core::Result<T>,
) -> Result<T, StepFailed> {
    let attempt = Attempt::begin(out, message);
    match step() {
        Ok(value) => {
            attempt.succeed();
            Ok(value)
        }
        Err(error) => {
            attempt.fail(&error);
            Err(error.into())
        }
    }
}
