//! Payload compaction.
//!
//! Reduces the scanner's nested per-package, per-version payload to the two
//! flat lists the checks work on. Packages without warnings are kept with an
//! empty list so later steps can tell "had none" from "filtered to none".

use crate::models::payload::{ScanPayload, Vulnerability};
use crate::models::DependencyWarning;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompactedDependencies {
    pub warnings: Vec<DependencyWarning>,
    pub vulnerabilities: Vec<Vulnerability>,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Flat, policy-ready view of a scan.
pub struct CompactedPayload {
    pub warnings: Vec<String>,
    pub dependencies: CompactedDependencies,
}

/// Compact a scanner payload.
///
/// - Warnings of every version of a package are concatenated, in version-key
///   order, into one entry per package.
/// - Vulnerabilities lacking both `severity` and `package` are dropped; kept
///   ones without a `package` inherit the owning dependency name.
pub fn compact_payload(payload: &ScanPayload) -> CompactedPayload {
    let mut warnings = Vec::with_capacity(payload.dependencies.len());
    let mut vulnerabilities = Vec::new();

    for (name, dependency) in &payload.dependencies {
        warnings.push(DependencyWarning {
            package: name.clone(),
            warnings: dependency
                .versions
                .values()
                .flat_map(|v| v.warnings.iter().cloned())
                .collect(),
        });

        for vuln in &dependency.vulnerabilities {
            if !vuln.is_processable() {
                tracing::debug!(package = %name, "dropping unprocessable vulnerability");
                continue;
            }
            let mut vuln = vuln.clone();
            if vuln.package.as_deref().map_or(true, str::is_empty) {
                vuln.package = Some(name.clone());
            }
            vulnerabilities.push(vuln);
        }
    }

    CompactedPayload {
        warnings: payload.warnings.clone(),
        dependencies: CompactedDependencies {
            warnings,
            vulnerabilities,
        },
    }
}
