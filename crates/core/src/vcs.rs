// Copyright 2025 mig3 Contributors
// SPDX-License-Identifier: Apache-2.0

//! Version-control lookup of the commit under test.
//!
//! [`RevisionSource`] is the seam the submission builder depends on;
//! [`GitRevisionSource`] is the production implementation and shells out to
//! the `git` binary.

use crate::error::{Mig3Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Author of the commit under test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Author name.
    pub name: String,
    /// Author email address.
    pub email: String,
}

/// The commit the tests were run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    /// Full hexadecimal commit hash.
    pub hash: String,
    /// Commit author.
    pub author: Author,
}

/// Something that can name the commit currently checked out.
#[cfg_attr(test, mockall::automock)]
pub trait RevisionSource {
    /// Return the HEAD commit.
    ///
    /// Fails with [`Mig3Error::VcsUnavailable`] outside of a repository or when
    /// the repository has no commits.
    fn head(&self) -> Result<Revision>;
}

/// Reads the HEAD commit with the `git` command line.
///
/// `git` searches parent directories for the repository, so any directory
/// inside a work tree can be used.
#[derive(Debug, Clone)]
pub struct GitRevisionSource {
    workdir: PathBuf,
    ceiling: Option<PathBuf>,
}

impl GitRevisionSource {
    /// Look up revisions from the repository containing `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            ceiling: None,
        }
    }

    /// Stop the repository search before entering `ceiling`
    /// (`GIT_CEILING_DIRECTORIES`).
    pub fn with_ceiling(mut self, ceiling: impl Into<PathBuf>) -> Self {
        self.ceiling = Some(ceiling.into());
        self
    }

    /// Look up revisions from the repository containing the current directory.
    pub fn current_dir() -> Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let mut command = Command::new("git");
        command.args(args).current_dir(&self.workdir);
        if let Some(ceiling) = &self.ceiling {
            command.env("GIT_CEILING_DIRECTORIES", ceiling);
        }

        let output = command
            .output()
            .map_err(|e| Mig3Error::VcsUnavailable(format!("Failed to run git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Mig3Error::VcsUnavailable(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl RevisionSource for GitRevisionSource {
    fn head(&self) -> Result<Revision> {
        // --verify makes an unborn HEAD an error instead of echoing "HEAD".
        let hash = self.git(&["rev-parse", "--verify", "HEAD"])?;
        let author = self.git(&["log", "-1", "--format=%an%n%ae", "HEAD"])?;
        let (name, email) = author.split_once('\n').unwrap_or((author.as_str(), ""));

        debug!(hash = %hash, workdir = %self.workdir.display(), "Resolved HEAD");
        Ok(Revision {
            hash,
            author: Author {
                name: name.to_string(),
                email: email.to_string(),
            },
        })
    }
}
