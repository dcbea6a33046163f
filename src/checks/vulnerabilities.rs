//! Vulnerability severity check.

use crate::checks::{CheckData, CheckOutcome};
use crate::models::payload::Vulnerability;
use crate::models::policy::SeverityThreshold;

/// Keep every vulnerability whose severity rank is at or above `threshold`;
/// fails when any remains. Identical advisories on different packages are
/// reported independently.
pub fn check_dependencies_vulnerabilities(
    vulnerabilities: &[Vulnerability],
    threshold: SeverityThreshold,
) -> CheckOutcome {
    let exceeding: Vec<Vulnerability> = vulnerabilities
        .iter()
        .filter(|v| threshold.admits(v.severity.as_ref()))
        .cloned()
        .collect();
    CheckOutcome::fail_if(!exceeding.is_empty(), CheckData::Vulnerabilities(exceeding))
}
