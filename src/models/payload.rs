//! Scanner payload schema: the raw dependency-analysis result consumed by
//! the gate.
//!
//! Every collection defaults to empty when absent so that a truncated or
//! partial payload still deserializes. Unknown fields are ignored.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
/// Root of a scanner run.
pub struct ScanPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub root_dependency_name: String,
    /// Global warnings emitted by the scanner itself.
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub dependencies: BTreeMap<String, Dependency>,
    #[serde(default)]
    pub scanner_version: Option<String>,
    #[serde(default)]
    pub vulnerability_strategy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
/// Per-package record: analyzed versions plus advisories.
pub struct Dependency {
    #[serde(default)]
    pub versions: BTreeMap<String, VersionRecord>,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VersionRecord {
    #[serde(default)]
    pub warnings: Vec<RawWarning>,
}

/// `[[start_line, start_column], [end_line, end_column]]`
pub type SourceLocation = [[u64; 2]; 2];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
/// Where a warning was found. Most kinds carry one range; `encoded-literal`
/// and merged duplicates carry a list. Any other shape is kept as-is.
pub enum Location {
    Single(SourceLocation),
    Multiple(Vec<SourceLocation>),
    Unrecognized(serde_json::Value),
}

impl Location {
    pub fn ranges(&self) -> &[SourceLocation] {
        match self {
            Self::Single(range) => std::slice::from_ref(range),
            Self::Multiple(ranges) => ranges.as_slice(),
            Self::Unrecognized(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// A single static-analysis finding in a package's source.
pub struct RawWarning {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl RawWarning {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            file: None,
            location: None,
        }
    }

    /// Start `line:column` of every range, comma-separated. `None` when no
    /// usable range is known.
    pub fn location_label(&self) -> Option<String> {
        let ranges = self.location.as_ref().map_or(&[][..], Location::ranges);
        if ranges.is_empty() {
            return None;
        }
        let starts: Vec<String> = ranges
            .iter()
            .map(|[[line, column], _]| format!("{line}:{column}"))
            .collect();
        Some(starts.join(","))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
/// Standardized advisory record attached to a dependency.
pub struct Vulnerability {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub cves: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvss_vector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cvss_score: Option<f64>,
    #[serde(default)]
    pub vulnerable_ranges: Vec<String>,
    #[serde(default)]
    pub vulnerable_versions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patched_versions: Option<String>,
}

impl Vulnerability {
    /// Records with neither a severity nor a package carry nothing a policy
    /// can act on.
    pub fn is_processable(&self) -> bool {
        self.severity.is_some() || self.package.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
/// Severity reported by an advisory. Unrecognized values are kept verbatim
/// and have no rank.
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
    Other(String),
}

impl Severity {
    /// `critical=4 > high=3 > medium=2 > low=1 > info=0`. `None` for
    /// unrecognized values, which no threshold admits.
    pub fn rank(&self) -> Option<u8> {
        match self {
            Self::Critical => Some(4),
            Self::High => Some(3),
            Self::Medium => Some(2),
            Self::Low => Some(1),
            Self::Info => Some(0),
            Self::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Info => "info",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        match s.as_str() {
            "info" => Self::Info,
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Other(s),
        }
    }
}

impl From<Severity> for String {
    fn from(s: Severity) -> Self {
        match s {
            Severity::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
