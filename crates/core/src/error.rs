// Copyright 2025 mig3 Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error type shared by every stage of the submission pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, converting, building or submitting
/// a test report.
#[derive(Debug, Error)]
pub enum Mig3Error {
    /// The report file does not exist.
    #[error("No such report file: {}", path.display())]
    NotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The report is not valid JSON or does not follow the pytest-json schema.
    #[error("{0}")]
    MalformedReport(String),

    /// No revision could be read from version control.
    #[error("{0}")]
    VcsUnavailable(String),

    /// The service rejected the results as a regression (HTTP 409).
    #[error("{0}")]
    Regression(String),

    /// The service answered with an unexpected status.
    #[error("Unexpected response status {status}: {body}")]
    RequestError {
        /// HTTP status code.
        status: u16,
        /// Response body, shown to the user.
        body: String,
    },

    /// The request could not be sent at all.
    #[error("{0}")]
    Transport(String),

    /// Local I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Mig3Error {
    /// Short name of the error kind, shown next to the FAIL marker.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NotFound",
            Self::MalformedReport(_) => "MalformedReport",
            Self::VcsUnavailable(_) => "VcsUnavailable",
            Self::Regression(_) => "Regression",
            Self::RequestError { .. } => "RequestError",
            Self::Transport(_) => "Transport",
            Self::Io(_) => "Io",
        }
    }
}

impl From<serde_json::Error> for Mig3Error {
    fn from(err: serde_json::Error) -> Self {
        Mig3Error::MalformedReport(format!("Invalid JSON: {}", err))
    }
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Mig3Error>;
