// Copyright 2025 mig3 Contributors
// SPDX-License-Identifier: Apache-2.0

//! Delivery of a [`Submission`] to the mig3 service.
//!
//! The service answers `201 Created` when the results are accepted and
//! `409 Conflict` when they regress against earlier runs of the same
//! configuration. Anything else is a request error.

use crate::error::{Mig3Error, Result};
use crate::submission::Submission;
use std::io::Write;
use std::time::Instant;
use tracing::{debug, info};

/// Status returned by the service for an accepted submission.
pub const STATUS_CREATED: u16 = 201;

/// Status returned by the service when the results regress.
pub const STATUS_CONFLICT: u16 = 409;

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Minimal HTTP transport used by the [`Submitter`].
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient {
    /// POST `body` to `url` with the given headers.
    ///
    /// Only failures to perform the request are errors; any HTTP status is
    /// returned as a response.
    fn post(&self, url: &str, body: &[u8], headers: &[(String, String)]) -> Result<HttpResponse>;
}

/// Blocking HTTP client backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Create a client with reqwest's default settings.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("mig3-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Mig3Error::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn post(&self, url: &str, body: &[u8], headers: &[(String, String)]) -> Result<HttpResponse> {
        let mut request = self.client.post(url).body(body.to_vec());
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request
            .send()
            .map_err(|e| Mig3Error::Transport(format!("Request to {} failed: {}", url, e)))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| Mig3Error::Transport(format!("Failed to read response body: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

/// Sends submissions to a mig3 job submission endpoint.
#[derive(Debug, Clone)]
pub struct Submitter<'a> {
    endpoint: &'a str,
    token: &'a str,
}

impl<'a> Submitter<'a> {
    /// Submit to `endpoint`, authenticating with the bearer `token`.
    pub fn new(endpoint: &'a str, token: &'a str) -> Self {
        Self { endpoint, token }
    }

    /// Headers sent with every submission.
    pub fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Authorization".to_string(), format!("Bearer {}", self.token)),
            ("Content-Type".to_string(), "application/json".to_string()),
        ]
    }

    /// POST the submission and interpret the response status.
    ///
    /// # Errors
    ///
    /// - [`Mig3Error::Regression`] on `409 Conflict`
    /// - [`Mig3Error::RequestError`] on any other status but `201 Created`
    /// - [`Mig3Error::Transport`] when the request cannot be performed
    pub fn submit(&self, client: &dyn HttpClient, submission: &Submission) -> Result<()> {
        let body = serde_json::to_vec(submission).map_err(|e| Mig3Error::Io(e.into()))?;

        let started = Instant::now();
        let response = client.post(self.endpoint, &body, &self.headers())?;
        info!(
            endpoint = %self.endpoint,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Submission sent"
        );

        interpret(response)
    }
}

fn interpret(response: HttpResponse) -> Result<()> {
    match response.status {
        STATUS_CREATED => Ok(()),
        STATUS_CONFLICT => {
            debug!(body = %response.body, "Submission rejected as a regression");
            let message = if response.body.trim().is_empty() {
                "Test results regressed".to_string()
            } else {
                response.body
            };
            Err(Mig3Error::Regression(message))
        }
        status => {
            debug!(status, body = %response.body, "Submission failed");
            Err(Mig3Error::RequestError {
                status,
                body: response.body,
            })
        }
    }
}

/// Write the submission as indented JSON instead of sending it.
pub fn write_dry_run(submission: &Submission, mut out: impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, submission).map_err(|e| Mig3Error::Io(e.into()))?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
