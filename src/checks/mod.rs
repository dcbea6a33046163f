//! Policy checks run by the interpreter.
//!
//! Each check returns a `CheckOutcome`: a pass/fail flag plus the findings
//! that justify it, tagged with the branch of the report they belong to.

pub mod vulnerabilities;
pub mod warnings;

use crate::models::payload::Vulnerability;
use crate::models::DependencyWarningWithMode;

pub use vulnerabilities::check_dependencies_vulnerabilities;
pub use warnings::{check_dependencies_warnings, check_global_warnings};

#[derive(Debug, Clone, PartialEq)]
/// Findings produced by a check, one variant per report branch.
pub enum CheckData {
    GlobalWarnings(Vec<String>),
    DependencyWarnings(Vec<DependencyWarningWithMode>),
    Vulnerabilities(Vec<Vulnerability>),
}

impl CheckData {
    /// Report path this data is written to.
    pub fn key(&self) -> &'static str {
        match self {
            Self::GlobalWarnings(_) => "warnings",
            Self::DependencyWarnings(_) => "dependencies.warnings",
            Self::Vulnerabilities(_) => "dependencies.vulnerabilities",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::GlobalWarnings(v) => v.len(),
            Self::DependencyWarnings(v) => v.len(),
            Self::Vulnerabilities(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub data: CheckData,
}

impl CheckOutcome {
    pub fn pass(data: CheckData) -> Self {
        Self { passed: true, data }
    }

    /// Fails when `failing` is true.
    pub fn fail_if(failing: bool, data: CheckData) -> Self {
        Self {
            passed: !failing,
            data,
        }
    }

    pub fn key(&self) -> &'static str {
        self.data.key()
    }
}
