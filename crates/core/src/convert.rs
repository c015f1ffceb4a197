// Copyright 2025 mig3 Contributors
// SPDX-License-Identifier: Apache-2.0

//! Conversion from the pytest-json report schema to mig3 test records.
//!
//! pytest-json writes a JSON-API style document where every test is an entry
//! of the top-level `included` array:
//!
//! ```text
//! {
//!   "included": [
//!     {"type": "test", "attributes": {"name": "tests/test_a.py::test_one", "outcome": "passed"}}
//!   ]
//! }
//! ```
//!
//! Only `attributes.name` and `attributes.outcome` are read; every other field
//! is ignored.

use crate::error::{Mig3Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Separator between module path and test name in a pytest node id.
pub const NAME_SEPARATOR: &str = "::";

/// One test result in the shape the mig3 service expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTest {
    /// Module path, e.g. `tests/test_api.py`.
    pub module: String,
    /// Test name within the module.
    pub test: String,
    /// Outcome label as reported by pytest (`passed`, `failed`, `skipped`, ...).
    pub outcome: String,
}

impl NormalizedTest {
    /// Build a record from a `module::test` node id.
    ///
    /// The id is split at the first separator, so class-qualified tests keep
    /// the class in the test name (`Class::method`).
    pub fn from_node_id(name: &str, outcome: impl Into<String>) -> Option<Self> {
        let (module, test) = name.split_once(NAME_SEPARATOR)?;
        if module.is_empty() || test.is_empty() {
            return None;
        }
        Some(Self {
            module: module.to_string(),
            test: test.to_string(),
            outcome: outcome.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct PytestJsonReport<'a> {
    #[serde(borrow)]
    included: Vec<TestDocument<'a>>,
}

#[derive(Debug, Deserialize)]
struct TestDocument<'a> {
    #[serde(borrow)]
    attributes: TestAttributes<'a>,
}

#[derive(Debug, Deserialize)]
struct TestAttributes<'a> {
    name: &'a str,
    outcome: &'a str,
}

/// Converts a parsed pytest-json report into mig3 test records.
#[derive(Debug, Clone, Copy)]
pub struct ReportConverter<'a> {
    report: &'a Value,
}

impl<'a> ReportConverter<'a> {
    /// Wrap a parsed report.
    pub fn new(report: &'a Value) -> Self {
        Self { report }
    }

    /// Convert every test of the report, preserving report order.
    pub fn convert(&self) -> Result<Vec<NormalizedTest>> {
        let report = PytestJsonReport::deserialize(self.report)
            .map_err(|e| Mig3Error::MalformedReport(format!("Unexpected report layout: {}", e)))?;

        let tests = report
            .included
            .iter()
            .enumerate()
            .map(|(index, document)| {
                let attributes = &document.attributes;
                NormalizedTest::from_node_id(attributes.name, attributes.outcome).ok_or_else(|| {
                    Mig3Error::MalformedReport(format!(
                        "Test #{} has name {:?}, expected \"<module>{}<test>\"",
                        index, attributes.name, NAME_SEPARATOR
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(count = tests.len(), "Report converted");
        Ok(tests)
    }
}

/// Convert a parsed report; shorthand for [`ReportConverter::convert`].
pub fn convert(report: &Value) -> Result<Vec<NormalizedTest>> {
    ReportConverter::new(report).convert()
}
