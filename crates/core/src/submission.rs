// Copyright 2025 mig3 Contributors
// SPDX-License-Identifier: Apache-2.0

//! The job submission document sent to mig3.

use crate::convert::NormalizedTest;
use crate::error::Result;
use crate::vcs::{Author, RevisionSource};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Version of this client, reported with every submission.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A complete job submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Commit hash the tests ran against.
    pub project_version: String,
    /// Author of that commit.
    pub author: Author,
    /// Test results, in report order.
    pub tests: Vec<NormalizedTest>,
    /// Project ID from the mig3 service.
    pub project: String,
    /// Configuration ID from the mig3 service.
    pub configuration: String,
    /// Version of the client that built the submission.
    pub client_version: String,
}

/// Assembles a [`Submission`] from converted tests and the current revision.
#[derive(Debug, Clone)]
pub struct SubmissionBuilder<'a> {
    project: &'a str,
    configuration: &'a str,
    tests: &'a [NormalizedTest],
}

impl<'a> SubmissionBuilder<'a> {
    /// Start a submission for the given project and configuration.
    pub fn new(project: &'a str, configuration: &'a str, tests: &'a [NormalizedTest]) -> Self {
        Self {
            project,
            configuration,
            tests,
        }
    }

    /// Look up the HEAD commit and build the submission.
    pub fn build(&self, revisions: &dyn RevisionSource) -> Result<Submission> {
        let revision = revisions.head()?;
        debug!(
            project_version = %revision.hash,
            tests = self.tests.len(),
            "Submission built"
        );

        Ok(Submission {
            project_version: revision.hash,
            author: revision.author,
            tests: self.tests.to_vec(),
            project: self.project.to_string(),
            configuration: self.configuration.to_string(),
            client_version: CLIENT_VERSION.to_string(),
        })
    }
}
