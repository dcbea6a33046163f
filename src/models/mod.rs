//! Shared data models: scanner payload, policy vocabulary, and the
//! interpreted result handed to reporters.

pub mod payload;
pub mod policy;

use crate::models::payload::{RawWarning, Vulnerability};
use crate::models::policy::WarningMode;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// All warnings of one package, concatenated across its analyzed versions.
pub struct DependencyWarning {
    pub package: String,
    pub warnings: Vec<RawWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A warning annotated with its resolved mode.
pub struct ModedWarning {
    #[serde(flatten)]
    pub warning: RawWarning,
    pub mode: WarningMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyWarningWithMode {
    pub package: String,
    pub warnings: Vec<ModedWarning>,
}

impl DependencyWarningWithMode {
    pub fn blocking_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| w.mode == WarningMode::Blocking)
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Gate verdict.
pub enum Status {
    Success,
    Failure,
}

impl Status {
    /// `Success` when every check passed.
    pub fn from_passing(all_passed: bool) -> Self {
        if all_passed {
            Self::Success
        } else {
            Self::Failure
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterpretedDependencies {
    pub warnings: Vec<DependencyWarningWithMode>,
    pub vulnerabilities: Vec<Vulnerability>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
/// Reporting tree: findings that are relevant under the active policy.
pub struct InterpretedPayload {
    pub warnings: Vec<String>,
    pub dependencies: InterpretedDependencies,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Final output of the interpreter.
pub struct InterpretedResult {
    pub status: Status,
    pub data: InterpretedPayload,
}

impl InterpretedResult {
    /// Total number of dependency warnings across packages.
    pub fn dependency_warning_count(&self) -> usize {
        self.data
            .dependencies
            .warnings
            .iter()
            .map(|d| d.warnings.len())
            .sum()
    }

    pub fn blocking_warning_count(&self) -> usize {
        self.data
            .dependencies
            .warnings
            .iter()
            .map(DependencyWarningWithMode::blocking_count)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payload::Location;
    use serde_json::json;

    #[test]
    fn test_result_serializes_report_shape() {
        let result = InterpretedResult {
            status: Status::Failure,
            data: InterpretedPayload {
                warnings: vec![],
                dependencies: InterpretedDependencies {
                    warnings: vec![DependencyWarningWithMode {
                        package: "express".into(),
                        warnings: vec![ModedWarning {
                            warning: RawWarning {
                                kind: "obfuscated-code".into(),
                                file: Some("index.js".into()),
                                location: Some(Location::Single([[0, 1], [5, 0]])),
                            },
                            mode: WarningMode::Blocking,
                        }],
                    }],
                    vulnerabilities: vec![],
                },
            },
        };
        let out = serde_json::to_value(&result).unwrap();
        assert_eq!(
            out,
            json!({
                "status": "failure",
                "data": {
                    "warnings": [],
                    "dependencies": {
                        "warnings": [{
                            "package": "express",
                            "warnings": [{
                                "kind": "obfuscated-code",
                                "file": "index.js",
                                "location": [[0, 1], [5, 0]],
                                "mode": "error"
                            }]
                        }],
                        "vulnerabilities": []
                    }
                }
            })
        );
        assert_eq!(result.blocking_warning_count(), 1);
    }

    #[test]
    fn test_status_from_passing() {
        assert_eq!(Status::from_passing(true), Status::Success);
        assert_eq!(Status::from_passing(false), Status::Failure);
        assert!(!Status::Failure.is_success());
    }
}
