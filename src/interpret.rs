//! Payload interpreter.
//!
//! Runs every check, merges their findings into one `InterpretedPayload`, and
//! derives the verdict: `Failure` iff at least one check failed. Checks are
//! never short-circuited; a failing check does not stop the next one because
//! its findings are still needed by reporters.

use crate::checks::{
    check_dependencies_vulnerabilities, check_dependencies_warnings, check_global_warnings,
    CheckData, CheckOutcome,
};
use crate::error::{GateError, Result};
use crate::extract::compact_payload;
use crate::ignore::exclude_ignored;
use crate::models::payload::ScanPayload;
use crate::models::policy::Configuration;
use crate::models::{InterpretedPayload, InterpretedResult, Status};
use std::fs;
use std::path::Path;

/// A deferred check. Evaluated exactly once by `interpret_checks`.
pub type PipelineCheck<'a> = Box<dyn FnOnce() -> CheckOutcome + 'a>;

#[derive(Debug, Default)]
/// Accumulates check outcomes into the report tree.
pub struct ResultBuilder {
    data: InterpretedPayload,
    failed: Vec<&'static str>,
}

impl ResultBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a check's findings into its branch and record its verdict.
    pub fn record(&mut self, outcome: CheckOutcome) {
        let key = outcome.key();
        tracing::debug!(
            check = key,
            passed = outcome.passed,
            findings = outcome.data.len(),
            "check evaluated"
        );
        if !outcome.passed {
            self.failed.push(key);
        }
        match outcome.data {
            CheckData::GlobalWarnings(v) => self.data.warnings = v,
            CheckData::DependencyWarnings(v) => self.data.dependencies.warnings = v,
            CheckData::Vulnerabilities(v) => self.data.dependencies.vulnerabilities = v,
        }
    }

    /// Keys of the checks that failed so far, in evaluation order.
    pub fn failed_checks(&self) -> &[&'static str] {
        &self.failed
    }

    pub fn finish(self) -> InterpretedResult {
        let status = Status::from_passing(self.failed.is_empty());
        tracing::info!(status = ?status, failed = ?self.failed, "pipeline verdict");
        InterpretedResult {
            status,
            data: self.data,
        }
    }
}

/// Evaluate every check in order and aggregate the outcome.
pub fn interpret_checks<'a>(
    checks: impl IntoIterator<Item = PipelineCheck<'a>>,
) -> InterpretedResult {
    let mut builder = ResultBuilder::new();
    for check in checks {
        builder.record(check());
    }
    builder.finish()
}

/// Read and parse a scanner payload file.
pub fn load_payload(path: &Path) -> Result<ScanPayload> {
    let raw = fs::read_to_string(path).map_err(|source| GateError::PayloadRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| GateError::PayloadParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Interpret a scanner payload under `config`.
///
/// Compacts the payload, drops ignored dependency warnings, then runs the
/// global-warning, dependency-warning and vulnerability checks.
pub fn run_payload_interpreter(payload: &ScanPayload, config: &Configuration) -> InterpretedResult {
    let compacted = compact_payload(payload);
    let global = compacted.warnings;
    let dependency_warnings =
        exclude_ignored(compacted.dependencies.warnings, &config.ignore_patterns);
    let vulnerabilities = compacted.dependencies.vulnerabilities;

    let checks: [PipelineCheck<'_>; 3] = [
        Box::new(|| check_global_warnings(&global)),
        Box::new(|| check_dependencies_warnings(&dependency_warnings, &config.warnings)),
        Box::new(|| {
            check_dependencies_vulnerabilities(&vulnerabilities, config.vulnerability_severity)
        }),
    ];
    interpret_checks(checks)
}
