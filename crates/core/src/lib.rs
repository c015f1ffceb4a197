// Copyright 2025 mig3 Contributors
// SPDX-License-Identifier: Apache-2.0

//! Report conversion and submission for the mig3 regression service.
//!
//! A run goes through four stages, each in its own module:
//!
//! - [`report`] - read a pytest-json report from disk or stdin
//! - [`convert`] - turn its tests into `{module, test, outcome}` records
//! - [`submission`] - attach project, configuration and the HEAD commit
//! - [`submit`] - POST the result, or print it for a dry run
//!
//! Version control and HTTP are reached through the [`RevisionSource`] and
//! [`HttpClient`] traits so both can be replaced in tests.
//!
//! # Example
//!
//! ```no_run
//! use mig3_core::{convert, read_report, GitRevisionSource, ReportSource, SubmissionBuilder};
//!
//! # fn main() -> mig3_core::Result<()> {
//! let report = read_report(&ReportSource::default())?;
//! let tests = convert(&report)?;
//! let submission = SubmissionBuilder::new("project-id", "configuration-id", &tests)
//!     .build(&GitRevisionSource::current_dir()?)?;
//! mig3_core::write_dry_run(&submission, std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod convert;
pub mod error;
pub mod report;
pub mod submission;
pub mod submit;
pub mod vcs;

pub use convert::{convert, NormalizedTest, ReportConverter};
pub use error::{Mig3Error, Result};
pub use report::{read_report, ReportSource, DEFAULT_REPORT};
pub use submission::{Submission, SubmissionBuilder, CLIENT_VERSION};
pub use submit::{write_dry_run, HttpClient, HttpResponse, ReqwestClient, Submitter};
pub use vcs::{Author, GitRevisionSource, Revision, RevisionSource};
