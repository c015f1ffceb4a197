// Copyright 2025 mig3 Contributors
// SPDX-License-Identifier: Apache-2.0

//! Report reading.
//!
//! Loads a pytest-json report from a file or standard input and parses it
//! into an untyped JSON document. Schema checks happen later, in
//! [`crate::convert`].

use crate::error::{Mig3Error, Result};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Report file name used when none is given.
pub const DEFAULT_REPORT: &str = ".report.json";

/// Where the report is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSource {
    /// A file on disk.
    File(PathBuf),
    /// Standard input, selected with `-`.
    Stdin,
}

impl Default for ReportSource {
    fn default() -> Self {
        ReportSource::File(PathBuf::from(DEFAULT_REPORT))
    }
}

impl FromStr for ReportSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "-" => Ok(Self::Stdin),
            path => Ok(Self::File(PathBuf::from(path))),
        }
    }
}

impl fmt::Display for ReportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => f.write_str("<stdin>"),
        }
    }
}

/// Read and parse the report from `source`.
pub fn read_report(source: &ReportSource) -> Result<Value> {
    match source {
        ReportSource::File(path) => read_report_file(path),
        ReportSource::Stdin => read_report_from(io::stdin().lock()),
    }
}

/// Read and parse a report file.
///
/// A missing file is reported as [`Mig3Error::NotFound`] without attempting
/// to parse anything.
pub fn read_report_file(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Mig3Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Mig3Error::Io(e),
    })?;
    debug!(path = %path.display(), bytes = content.len(), "Report loaded");
    parse_report(&content)
}

/// Read and parse a report from any reader.
pub fn read_report_from(mut reader: impl Read) -> Result<Value> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    debug!(bytes = content.len(), "Report loaded from stream");
    parse_report(&content)
}

fn parse_report(content: &str) -> Result<Value> {
    Ok(serde_json::from_str(content)?)
}
