//! Configuration discovery and standardization.
//!
//! Scangate reads `scangate.toml|yaml|yml` from the repository root (or
//! closest ancestor), merges it with CLI flags, validates every value, and
//! produces the immutable `Configuration` consumed by the interpreter.
//! Defaults:
//! - `strategy`: `github-advisory`
//! - `vulnerabilities.severity`: `medium`
//! - `warnings`: `error`
//! - `reporters`: `["console"]`
//! - `output`: `human`
//! - `directory`: repository root
//!
//! Overrides precedence: CLI > config file > defaults. Invalid values fall
//! back to their default instead of failing the run.

use crate::error::{ConfigError, GateError};
use crate::ignore::load_ignore_file;
use crate::models::policy::{
    is_known_warning_kind, Configuration, ReporterTarget, SeverityThreshold, Strategy,
    WarningMode, WarningPolicy,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAMES: [&str; 3] = ["scangate.toml", "scangate.yaml", "scangate.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// `[vulnerabilities]` section.
pub struct VulnerabilitiesCfg {
    pub severity: Option<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
/// `warnings = "error"` or a `[warnings]` table of kind -> mode.
pub enum WarningsCfg {
    Mode(String),
    PerKind(BTreeMap<String, String>),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
/// `reporters = ["console", "html"]` or `reporters = "console,html"`.
pub enum ReportersCfg {
    List(Vec<String>),
    Csv(String),
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `scangate.toml|yaml`.
pub struct GateConfigFile {
    pub directory: Option<String>,
    pub strategy: Option<String>,
    pub reporters: Option<ReportersCfg>,
    pub warnings: Option<WarningsCfg>,
    pub vulnerabilities: Option<VulnerabilitiesCfg>,
    pub output: Option<String>,
}

#[derive(Debug, Default, Clone)]
/// Raw options provided on the command line.
pub struct CliOverrides {
    pub repo_root: Option<String>,
    pub directory: Option<String>,
    pub strategy: Option<String>,
    pub vulnerabilities: Option<String>,
    pub warnings: Option<String>,
    pub reporters: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq)]
/// Unvalidated options after applying precedence.
pub struct ExternalOptions {
    pub directory: Option<String>,
    pub strategy: Option<String>,
    pub severity: Option<String>,
    pub warnings: Option<WarningsCfg>,
    pub reporters: Option<ReportersCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved settings used by commands.
pub struct Effective {
    pub repo_root: PathBuf,
    /// Config file that was loaded, if any.
    pub config_file: Option<PathBuf>,
    pub output: String,
    pub configuration: Configuration,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `scangate.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_FILE_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// First existing config file under `root`, in `CONFIG_FILE_NAMES` order.
pub fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|n| root.join(n))
        .find(|p| p.exists())
}

/// Load the config file under `root`. `Ok(None)` when there is none.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, GateConfigFile)>, ConfigError> {
    let Some(path) = find_config_file(root) else {
        return Ok(None);
    };
    let raw = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let cfg = if path.extension().is_some_and(|e| e == "toml") {
        toml::from_str(&raw).map_err(|source| ConfigError::Toml {
            path: path.clone(),
            source,
        })?
    } else {
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
            path: path.clone(),
            source,
        })?
    };
    Ok(Some((path, cfg)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn non_blank_warnings(value: Option<WarningsCfg>) -> Option<WarningsCfg> {
    match value {
        Some(WarningsCfg::Mode(s)) if s.trim().is_empty() => None,
        Some(WarningsCfg::PerKind(m)) if m.is_empty() => None,
        other => other,
    }
}

fn non_blank_reporters(value: Option<ReportersCfg>) -> Option<ReportersCfg> {
    match value {
        Some(ReportersCfg::Csv(s)) if s.trim().is_empty() => None,
        Some(ReportersCfg::List(l)) if l.is_empty() => None,
        other => other,
    }
}

/// Merge CLI flags over the config file. Blank values count as absent so
/// they never mask a lower-precedence source.
pub fn merge_options(cli: &CliOverrides, file: GateConfigFile) -> ExternalOptions {
    ExternalOptions {
        directory: non_blank(cli.directory.clone()).or(non_blank(file.directory)),
        strategy: non_blank(cli.strategy.clone()).or(non_blank(file.strategy)),
        severity: non_blank(cli.vulnerabilities.clone())
            .or(non_blank(file.vulnerabilities.and_then(|v| v.severity))),
        warnings: non_blank_warnings(cli.warnings.clone().map(WarningsCfg::Mode))
            .or(non_blank_warnings(file.warnings)),
        reporters: non_blank_reporters(cli.reporters.clone().map(ReportersCfg::Csv))
            .or(non_blank_reporters(file.reporters)),
    }
}

/// Resolve the analysis directory relative to `root`. Falls back to `root`
/// when the directory does not exist.
pub fn adapt_directory(root: &Path, directory: Option<&str>) -> PathBuf {
    let Some(dir) = directory else {
        return root.to_path_buf();
    };
    let candidate = root.join(dir);
    if candidate.exists() {
        candidate.canonicalize().unwrap_or(candidate)
    } else {
        tracing::warn!(directory = dir, "directory not found; using repository root");
        root.to_path_buf()
    }
}

pub fn adapt_strategy(strategy: Option<&str>) -> Strategy {
    match strategy {
        None => Strategy::default(),
        Some(s) => Strategy::from_input(s).unwrap_or_else(|| {
            tracing::warn!(strategy = s, "unknown strategy; using default");
            Strategy::default()
        }),
    }
}

pub fn adapt_severity(severity: Option<&str>) -> SeverityThreshold {
    match severity {
        None => SeverityThreshold::default(),
        Some(s) => SeverityThreshold::parse(s).unwrap_or_else(|| {
            tracing::warn!(severity = s, "unknown severity threshold; using default");
            SeverityThreshold::default()
        }),
    }
}

/// A valid mode string becomes `Uniform`. A table keeps only entries with a
/// known kind and a valid mode. Anything else resolves to `Uniform(error)`.
pub fn adapt_warnings(warnings: Option<&WarningsCfg>) -> WarningPolicy {
    match warnings {
        None => WarningPolicy::default(),
        Some(WarningsCfg::Mode(s)) => match WarningMode::parse(s) {
            Some(mode) => WarningPolicy::Uniform(mode),
            None => {
                tracing::warn!(warnings = %s, "unknown warning mode; using default");
                WarningPolicy::default()
            }
        },
        Some(WarningsCfg::PerKind(table)) => {
            let valid: BTreeMap<String, WarningMode> = table
                .iter()
                .filter_map(|(kind, mode)| {
                    let parsed = WarningMode::parse(mode).filter(|_| is_known_warning_kind(kind));
                    if parsed.is_none() {
                        tracing::warn!(kind = %kind, mode = %mode, "discarding warning policy entry");
                    }
                    parsed.map(|m| (kind.clone(), m))
                })
                .collect();
            if valid.is_empty() {
                WarningPolicy::default()
            } else {
                WarningPolicy::PerKind(valid)
            }
        }
    }
}

/// Deduplicate (first occurrence wins) and drop unknown targets.
pub fn adapt_reporters(reporters: Option<&ReportersCfg>) -> Vec<ReporterTarget> {
    let raw: Vec<String> = match reporters {
        None => return vec![ReporterTarget::Console],
        Some(ReportersCfg::List(l)) => l.clone(),
        Some(ReportersCfg::Csv(s)) => s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .split(',')
            .map(str::to_string)
            .collect(),
    };
    let mut out: Vec<ReporterTarget> = Vec::new();
    for name in &raw {
        match ReporterTarget::parse(name) {
            Some(t) if !out.contains(&t) => out.push(t),
            Some(_) => {}
            None => tracing::warn!(reporter = %name, "unknown reporter target dropped"),
        }
    }
    out
}

/// Validate merged options into a `Configuration` rooted at `root`.
/// Ignore patterns are left empty; see `resolve_effective`.
pub fn standardize(root: &Path, opts: &ExternalOptions) -> Configuration {
    Configuration {
        root_dir: adapt_directory(root, opts.directory.as_deref()),
        strategy: adapt_strategy(opts.strategy.as_deref()),
        reporters: adapt_reporters(opts.reporters.as_ref()),
        vulnerability_severity: adapt_severity(opts.severity.as_deref()),
        warnings: adapt_warnings(opts.warnings.as_ref()),
        ..Configuration::with_root(root.to_path_buf())
    }
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults,
/// then loading ignore rules from the analysis directory.
///
/// An unreadable config file or ignore file is reported and treated as absent.
pub fn resolve_effective(cli: &CliOverrides) -> Effective {
    let start = PathBuf::from(cli.repo_root.as_deref().unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let (config_file, file) = match load_config(&repo_root) {
        Ok(Some((path, cfg))) => (Some(path), cfg),
        Ok(None) => (None, GateConfigFile::default()),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring config file");
            (None, GateConfigFile::default())
        }
    };
    let output = non_blank(cli.output.clone())
        .or(non_blank(file.output.clone()))
        .unwrap_or_else(|| "human".to_string());

    let opts = merge_options(cli, file);
    let mut configuration = standardize(&repo_root, &opts);
    configuration.ignore_patterns = match load_ignore_file(&configuration.root_dir) {
        Ok(patterns) => patterns,
        Err(e) => {
            tracing::warn!(error = %e, "ignore file rejected; no ignore rules applied");
            Default::default()
        }
    };
    tracing::debug!(
        root = %configuration.root_dir.display(),
        strategy = configuration.strategy.label(),
        severity = %configuration.vulnerability_severity,
        warnings = configuration.warnings.label(),
        ignore_rules = configuration.ignore_patterns.len(),
        "configuration resolved"
    );

    Effective {
        repo_root,
        config_file,
        output,
        configuration,
    }
}

/// Default `scangate.toml` written by `scangate init`.
pub fn default_config_template() -> String {
    let defaults = Configuration::default();
    format!(
        r#"# scangate configuration
strategy = "{}"
reporters = ["{}"]
# "off" | "warning" | "error", or a [warnings] table of kind = mode
warnings = "{}"

[vulnerabilities]
# "all" | "info" | "low" | "medium" | "high" | "critical"
severity = "{}"
"#,
        defaults.strategy.input_key(),
        ReporterTarget::Console.as_str(),
        defaults.warnings.label(),
        defaults.vulnerability_severity,
    )
}

/// Write `scangate.toml` under `root`. Refuses to overwrite unless `force`.
pub fn write_default_config(root: &Path, force: bool) -> Result<PathBuf, GateError> {
    let path = root.join(CONFIG_FILE_NAMES[0]);
    if path.exists() && !force {
        return Err(GateError::ConfigExists(path));
    }
    fs::write(&path, default_config_template()).map_err(|source| GateError::ConfigWrite {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ignore::IGNORE_FILE_NAME;
    use std::io::Write;
    use tempfile::tempdir;

    fn cli_at(root: &Path) -> CliOverrides {
        CliOverrides {
            repo_root: root.to_str().map(str::to_string),
            ..CliOverrides::default()
        }
    }

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempdir().unwrap();
        let eff = resolve_effective(&cli_at(dir.path()));
        assert!(eff.config_file.is_none());
        assert_eq!(eff.output, "human");
        let cfg = eff.configuration;
        assert_eq!(cfg.strategy, Strategy::GithubAdvisory);
        assert_eq!(cfg.vulnerability_severity, SeverityThreshold::Medium);
        assert_eq!(cfg.warnings, WarningPolicy::Uniform(WarningMode::Blocking));
        assert_eq!(cfg.reporters, [ReporterTarget::Console]);
        assert!(cfg.ignore_patterns.is_empty());
    }

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("scangate.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
strategy = "snyk"
reporters = "console, html"
output = "json"

[warnings]
obfuscated-code = "error"
unsafe-import = "warning"

[vulnerabilities]
severity = "high"
    "#
        )
        .unwrap();

        let eff = resolve_effective(&cli_at(root));
        assert_eq!(eff.config_file, Some(root.join("scangate.toml")));
        assert_eq!(eff.output, "json");
        let cfg = eff.configuration;
        assert_eq!(cfg.strategy, Strategy::Snyk);
        assert_eq!(cfg.vulnerability_severity, SeverityThreshold::High);
        assert_eq!(cfg.reporters, [ReporterTarget::Console, ReporterTarget::Html]);
        assert_eq!(cfg.warnings.mode_for("obfuscated-code"), WarningMode::Blocking);
        assert_eq!(cfg.warnings.mode_for("unsafe-import"), WarningMode::Advisory);
        assert_eq!(cfg.warnings.mode_for("weak-crypto"), WarningMode::Off);
    }

    #[test]
    fn test_load_yaml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("scangate.yaml"),
            r#"
warnings: "off"
reporters: [console]
vulnerabilities:
  severity: critical
"#,
        )
        .unwrap();
        let cfg = resolve_effective(&cli_at(root)).configuration;
        assert_eq!(cfg.warnings, WarningPolicy::Uniform(WarningMode::Off));
        assert_eq!(cfg.vulnerability_severity, SeverityThreshold::Critical);
    }

    #[test]
    fn test_cli_takes_precedence_over_file() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("scangate.toml"),
            "warnings = \"off\"\n[vulnerabilities]\nseverity = \"low\"\n",
        )
        .unwrap();
        let cli = CliOverrides {
            warnings: Some("warning".into()),
            vulnerabilities: Some("critical".into()),
            // blank values never mask the file
            strategy: Some("  ".into()),
            ..cli_at(root)
        };
        let cfg = resolve_effective(&cli).configuration;
        assert_eq!(cfg.warnings, WarningPolicy::Uniform(WarningMode::Advisory));
        assert_eq!(cfg.vulnerability_severity, SeverityThreshold::Critical);
        assert_eq!(cfg.strategy, Strategy::GithubAdvisory);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let root = Path::new(".");
        let opts = ExternalOptions {
            directory: None,
            strategy: Some("npm".into()),
            severity: Some("urgent".into()),
            warnings: Some(WarningsCfg::Mode("fatal".into())),
            reporters: Some(ReportersCfg::List(vec!["pdf".into()])),
        };
        let cfg = standardize(root, &opts);
        assert_eq!(cfg.strategy, Strategy::GithubAdvisory);
        assert_eq!(cfg.vulnerability_severity, SeverityThreshold::Medium);
        assert_eq!(cfg.warnings, WarningPolicy::Uniform(WarningMode::Blocking));
        assert!(cfg.reporters.is_empty());
    }

    #[test]
    fn test_per_kind_table_drops_unknown_kinds_and_modes() {
        let mut table = BTreeMap::new();
        table.insert("obfuscated-code".to_string(), "error".to_string());
        table.insert("not-a-kind".to_string(), "error".to_string());
        table.insert("weak-crypto".to_string(), "loud".to_string());
        let policy = adapt_warnings(Some(&WarningsCfg::PerKind(table)));
        match policy {
            WarningPolicy::PerKind(m) => {
                assert_eq!(m.len(), 1);
                assert_eq!(m["obfuscated-code"], WarningMode::Blocking);
            }
            other => panic!("expected per-kind policy, got {other:?}"),
        }

        let mut only_invalid = BTreeMap::new();
        only_invalid.insert("not-a-kind".to_string(), "off".to_string());
        assert_eq!(
            adapt_warnings(Some(&WarningsCfg::PerKind(only_invalid))),
            WarningPolicy::Uniform(WarningMode::Blocking)
        );
    }

    #[test]
    fn test_reporters_csv_deduplicated() {
        let out = adapt_reporters(Some(&ReportersCfg::Csv(" html ,console,html".into())));
        assert_eq!(out, [ReporterTarget::Html, ReporterTarget::Console]);
    }

    #[test]
    fn test_missing_directory_falls_back_to_root() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        assert_eq!(adapt_directory(root, Some("does-not-exist")), root);
        fs::create_dir(root.join("app")).unwrap();
        let resolved = adapt_directory(root, Some("app"));
        assert!(resolved.ends_with("app"));
    }

    #[test]
    fn test_ignore_file_loaded_from_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join(IGNORE_FILE_NAME),
            r#"{ "warnings": { "unsafe-stmt": ["express"] } }"#,
        )
        .unwrap();
        let cfg = resolve_effective(&cli_at(root)).configuration;
        assert!(cfg.ignore_patterns.is_ignored("unsafe-stmt", "express"));
    }

    #[test]
    fn test_invalid_ignore_file_means_no_rules() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join(IGNORE_FILE_NAME), "{ not json").unwrap();
        let cfg = resolve_effective(&cli_at(root)).configuration;
        assert!(cfg.ignore_patterns.is_empty());
    }

    #[test]
    fn test_invalid_config_file_is_ignored() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("scangate.toml"), "warnings = [1, 2]").unwrap();
        let eff = resolve_effective(&cli_at(root));
        assert!(eff.config_file.is_none());
        assert_eq!(
            eff.configuration.warnings,
            WarningPolicy::Uniform(WarningMode::Blocking)
        );
    }

    #[test]
    fn test_write_default_config_round_trips() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let path = write_default_config(root, false).unwrap();
        assert!(path.exists());
        assert!(matches!(
            write_default_config(root, false),
            Err(GateError::ConfigExists(_))
        ));
        assert!(write_default_config(root, true).is_ok());

        let (_, cfg) = load_config(root).unwrap().unwrap();
        let opts = merge_options(&CliOverrides::default(), cfg);
        let standardized = standardize(root, &opts);
        let defaults = Configuration::with_root(root.to_path_buf());
        assert_eq!(standardized.strategy, defaults.strategy);
        assert_eq!(standardized.warnings, defaults.warnings);
        assert_eq!(standardized.vulnerability_severity, defaults.vulnerability_severity);
        assert_eq!(standardized.reporters, defaults.reporters);
    }
}
