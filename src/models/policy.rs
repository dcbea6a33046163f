//! Policy vocabulary shared by configuration and the evaluators.
//!
//! Key components:
//! - `WarningMode`: how a warning kind is handled (`off|warning|error`).
//! - `WarningPolicy`: one mode for every kind, or a per-kind table.
//! - `SeverityThreshold`: minimum vulnerability severity that fails the gate.
//! - `Configuration`: the resolved, immutable runtime configuration.

use crate::ignore::IgnorePatterns;
use crate::models::payload::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Warning kinds emitted by the source analyzer. Per-kind policy entries
/// naming anything else are discarded during configuration standardization.
pub const KNOWN_WARNING_KINDS: &[&str] = &[
    "parsing-error",
    "encoded-literal",
    "unsafe-regex",
    "unsafe-stmt",
    "unsafe-import",
    "unsafe-command",
    "short-identifiers",
    "suspicious-literal",
    "suspicious-file",
    "obfuscated-code",
    "weak-crypto",
    "shady-link",
    "synchronous-io",
    "serialize-environment",
];

pub fn is_known_warning_kind(kind: &str) -> bool {
    KNOWN_WARNING_KINDS.contains(&kind)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Resolved handling of a warning: suppressed, advisory, or build-breaking.
pub enum WarningMode {
    #[serde(rename = "off")]
    Off,
    #[serde(rename = "warning", alias = "advisory")]
    Advisory,
    #[serde(rename = "error", alias = "blocking")]
    Blocking,
}

impl WarningMode {
    /// Parse a mode from its configuration spelling. Accepts the
    /// `advisory|blocking` aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "off" => Some(Self::Off),
            "warning" | "advisory" => Some(Self::Advisory),
            "error" | "blocking" => Some(Self::Blocking),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Advisory => "warning",
            Self::Blocking => "error",
        }
    }
}

impl fmt::Display for WarningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Active warning policy.
///
/// `Uniform` applies one mode to every kind. `PerKind` resolves each kind
/// through the table; kinds absent from the table resolve to `Off`.
pub enum WarningPolicy {
    Uniform(WarningMode),
    PerKind(BTreeMap<String, WarningMode>),
}

impl WarningPolicy {
    /// Effective mode for a warning kind under this policy.
    pub fn mode_for(&self, kind: &str) -> WarningMode {
        match self {
            Self::Uniform(mode) => *mode,
            Self::PerKind(table) => table.get(kind).copied().unwrap_or(WarningMode::Off),
        }
    }

    /// Short label used by printers (`off|warning|error|per-kind`).
    pub fn label(&self) -> &'static str {
        match self {
            Self::Uniform(mode) => mode.as_str(),
            Self::PerKind(_) => "per-kind",
        }
    }
}

impl Default for WarningPolicy {
    fn default() -> Self {
        Self::Uniform(WarningMode::Blocking)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Minimum vulnerability severity that makes the gate fail.
pub enum SeverityThreshold {
    All,
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityThreshold {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "all" => Some(Self::All),
            "info" => Some(Self::Info),
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Info => "info",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Ordinal rank: `critical=4 > high=3 > medium=2 > low=1 > info=all=0`.
    pub fn rank(self) -> u8 {
        match self {
            Self::All | Self::Info => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    /// Whether a vulnerability of the given severity reaches this threshold.
    /// A missing severity ranks lowest; an unrecognized one is never admitted.
    pub fn admits(self, severity: Option<&Severity>) -> bool {
        let rank = match severity {
            None => Some(0),
            Some(s) => s.rank(),
        };
        rank.is_some_and(|r| r >= self.rank())
    }
}

impl Default for SeverityThreshold {
    fn default() -> Self {
        Self::Medium
    }
}

impl fmt::Display for SeverityThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Vulnerability database strategy label. Carried through, never interpreted
/// by the evaluators.
pub enum Strategy {
    #[default]
    GithubAdvisory,
    Snyk,
    Sonatype,
    None,
}

impl Strategy {
    /// Resolve the user-facing key (`github-advisory|snyk|sonatype|none`).
    pub fn from_input(s: &str) -> Option<Self> {
        match s.trim() {
            "github-advisory" => Some(Self::GithubAdvisory),
            "snyk" => Some(Self::Snyk),
            "sonatype" => Some(Self::Sonatype),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    pub fn input_key(self) -> &'static str {
        match self {
            Self::GithubAdvisory => "github-advisory",
            Self::Snyk => "snyk",
            Self::Sonatype => "sonatype",
            Self::None => "none",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::GithubAdvisory => "GITHUB-ADVISORY",
            Self::Snyk => "SNYK",
            Self::Sonatype => "SONATYPE",
            Self::None => "NONE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Reporting collaborator selected by configuration.
pub enum ReporterTarget {
    Console,
    Html,
}

impl ReporterTarget {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "console" => Some(Self::Console),
            "html" => Some(Self::Html),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Html => "html",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Fully-resolved runtime configuration. Built once per run and only ever
/// read by the evaluators.
pub struct Configuration {
    pub root_dir: PathBuf,
    pub strategy: Strategy,
    pub reporters: Vec<ReporterTarget>,
    pub vulnerability_severity: SeverityThreshold,
    pub warnings: WarningPolicy,
    pub ignore_patterns: IgnorePatterns,
}

impl Configuration {
    /// Defaults rooted at `root_dir`: github-advisory, console reporter,
    /// `medium` threshold, every warning blocking, no ignore rules.
    pub fn with_root(root_dir: PathBuf) -> Self {
        Self {
            root_dir,
            strategy: Strategy::default(),
            reporters: vec![ReporterTarget::Console],
            vulnerability_severity: SeverityThreshold::default(),
            warnings: WarningPolicy::default(),
            ignore_patterns: IgnorePatterns::default(),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::with_root(PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_mode_parse_accepts_aliases() {
        assert_eq!(WarningMode::parse("error"), Some(WarningMode::Blocking));
        assert_eq!(WarningMode::parse("blocking"), Some(WarningMode::Blocking));
        assert_eq!(WarningMode::parse("advisory"), Some(WarningMode::Advisory));
        assert_eq!(WarningMode::parse("warning"), Some(WarningMode::Advisory));
        assert_eq!(WarningMode::parse("off"), Some(WarningMode::Off));
        assert_eq!(WarningMode::parse("fatal"), None);
    }

    #[test]
    fn test_warning_mode_serializes_config_spelling() {
        let out = serde_json::to_value([WarningMode::Advisory, WarningMode::Blocking]).unwrap();
        assert_eq!(out, serde_json::json!(["warning", "error"]));
        let parsed: WarningMode = serde_json::from_str("\"blocking\"").unwrap();
        assert_eq!(parsed, WarningMode::Blocking);
    }

    #[test]
    fn test_per_kind_policy_defaults_to_off() {
        let mut table = BTreeMap::new();
        table.insert("obfuscated-code".to_string(), WarningMode::Blocking);
        let policy = WarningPolicy::PerKind(table);
        assert_eq!(policy.mode_for("obfuscated-code"), WarningMode::Blocking);
        assert_eq!(policy.mode_for("unsafe-regex"), WarningMode::Off);
        assert_eq!(policy.label(), "per-kind");
    }

    #[test]
    fn test_threshold_ranks() {
        assert_eq!(SeverityThreshold::All.rank(), SeverityThreshold::Info.rank());
        assert!(SeverityThreshold::Critical.rank() > SeverityThreshold::High.rank());
        assert!(SeverityThreshold::High.rank() > SeverityThreshold::Medium.rank());
        assert!(SeverityThreshold::Medium.rank() > SeverityThreshold::Low.rank());
    }

    #[test]
    fn test_threshold_admits_missing_severity_only_at_lowest_rank() {
        assert!(SeverityThreshold::All.admits(None));
        assert!(SeverityThreshold::Info.admits(None));
        assert!(!SeverityThreshold::Low.admits(None));
        let high = Severity::High;
        assert!(SeverityThreshold::Medium.admits(Some(&high)));
        assert!(!SeverityThreshold::Critical.admits(Some(&high)));
    }

    #[test]
    fn test_threshold_never_admits_unrecognized_severity() {
        let moderate = Severity::Other("moderate".into());
        assert!(!SeverityThreshold::All.admits(Some(&moderate)));
        assert!(!SeverityThreshold::Info.admits(Some(&moderate)));
        assert!(SeverityThreshold::All.admits(Some(&Severity::Info)));
    }

    #[test]
    fn test_strategy_keys_and_labels() {
        assert_eq!(Strategy::from_input("snyk"), Some(Strategy::Snyk));
        assert_eq!(Strategy::from_input("npm"), None);
        assert_eq!(Strategy::default().label(), "GITHUB-ADVISORY");
        assert_eq!(Strategy::Sonatype.input_key(), "sonatype");
    }
}
