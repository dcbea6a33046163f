//! Output rendering for gate results.
//!
//! Supports `human` (default, the console reporter) and `json` outputs. The
//! JSON form is the serialized `InterpretedResult`.

use crate::error::Result;
use crate::models::payload::Vulnerability;
use crate::models::policy::{Configuration, WarningMode, WarningPolicy};
use crate::models::{DependencyWarningWithMode, InterpretedResult, ModedWarning, Status};
use crate::utils::pluralize;
use owo_colors::OwoColorize;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print a gate result in the requested format.
pub fn print_result(res: &InterpretedResult, config: &Configuration, output: &str) -> Result<()> {
    match output {
        "json" => println!("{}", serde_json::to_string_pretty(&compose_result_json(res)?)?),
        _ => print!("{}", render_human(res, config, use_colors(output))),
    }
    Ok(())
}

/// Compose the result JSON object (pure) for testing/snapshot purposes.
pub fn compose_result_json(res: &InterpretedResult) -> Result<JsonVal> {
    Ok(serde_json::to_value(res)?)
}

/// `N global warnings | N dependency warnings | N vulnerabilities`.
///
/// The middle segment reads `dependency warnings skipped` when the policy
/// turns every dependency warning off.
pub fn outcome_stats_line(res: &InterpretedResult, policy: &WarningPolicy) -> String {
    let global = pluralize(res.data.warnings.len(), "global warning", "global warnings");
    let deps = match policy {
        WarningPolicy::Uniform(WarningMode::Off) => "dependency warnings skipped".to_string(),
        _ => pluralize(
            res.dependency_warning_count(),
            "dependency warning",
            "dependency warnings",
        ),
    };
    let vulns = pluralize(
        res.data.dependencies.vulnerabilities.len(),
        "vulnerability",
        "vulnerabilities",
    );
    format!("{global} | {deps} | {vulns}")
}

/// `package/file:line:column[,line:column...]`, or just the package when no
/// file is known.
fn warning_origin(package: &str, w: &ModedWarning) -> String {
    match (&w.warning.file, w.warning.location_label()) {
        (Some(file), Some(label)) => format!("{package}/{file}:{label}"),
        (Some(file), None) => format!("{package}/{file}"),
        _ => package.to_string(),
    }
}

fn render_dependency_warnings(deps: &[DependencyWarningWithMode], color: bool, out: &mut String) {
    for dep in deps {
        for w in &dep.warnings {
            let tag = format!("[{}]", w.mode);
            let (icon, tag) = match (w.mode, color) {
                (WarningMode::Blocking, true) => {
                    ("✖".red().to_string(), tag.red().bold().to_string())
                }
                (_, true) => ("▲".yellow().to_string(), tag.yellow().bold().to_string()),
                (WarningMode::Blocking, false) => ("✖".to_string(), tag),
                (_, false) => ("▲".to_string(), tag),
            };
            let origin = warning_origin(&dep.package, w);
            let origin = if color {
                origin.bold().to_string()
            } else {
                origin
            };
            out.push_str(&format!("  {icon} {tag} {} {origin}\n", w.warning.kind));
        }
    }
}

fn render_vulnerabilities(vulns: &[Vulnerability], color: bool, out: &mut String) {
    for v in vulns {
        let severity = v.severity.as_ref().map_or("unknown", |s| s.as_str());
        let tag = format!("[{severity}]");
        let tag = if color {
            tag.red().bold().to_string()
        } else {
            tag
        };
        let package = v.package.as_deref().unwrap_or_default();
        let mut line = format!("  ✖ {tag} {package}");
        if let Some(title) = &v.title {
            line.push_str(&format!(" {title}"));
        }
        if !v.vulnerable_ranges.is_empty() {
            line.push_str(&format!(" ({})", v.vulnerable_ranges.join(", ")));
        }
        out.push_str(&line);
        out.push('\n');
    }
}

fn heading(text: &str, color: bool) -> String {
    if color {
        format!("{}\n", text.bold().underline())
    } else {
        format!("{text}\n")
    }
}

/// Render the console report (pure).
pub fn render_human(res: &InterpretedResult, config: &Configuration, color: bool) -> String {
    let mut out = String::new();

    if !res.data.warnings.is_empty() {
        out.push_str(&heading("Global warnings", color));
        for w in &res.data.warnings {
            let icon = if color {
                "✖".red().to_string()
            } else {
                "✖".to_string()
            };
            out.push_str(&format!("  {icon} {w}\n"));
        }
    }
    if !res.data.dependencies.warnings.is_empty() {
        out.push_str(&heading("Dependency warnings", color));
        render_dependency_warnings(&res.data.dependencies.warnings, color, &mut out);
    }
    if !res.data.dependencies.vulnerabilities.is_empty() {
        out.push_str(&heading(
            &format!("Vulnerabilities ({})", config.strategy.label()),
            color,
        ));
        render_vulnerabilities(&res.data.dependencies.vulnerabilities, color, &mut out);
    }

    let stats = outcome_stats_line(res, &config.warnings);
    let verdict = match res.status {
        Status::Success => "[SUCCESS] Pipeline successful",
        Status::Failure => "[FAILURE] Pipeline failed",
    };
    if color {
        out.push_str(&format!("{}\n", stats.bold()));
        let verdict = match res.status {
            Status::Success => verdict.green().bold().to_string(),
            Status::Failure => verdict.red().bold().to_string(),
        };
        out.push_str(&format!("{verdict}\n"));
    } else {
        out.push_str(&format!("{stats}\n{verdict}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payload::{Location, RawWarning, Severity};
    use crate::models::{InterpretedDependencies, InterpretedPayload};

    fn sample_result() -> InterpretedResult {
        let mut located = RawWarning::new("obfuscated-code");
        located.file = Some("lib/index.js".into());
        located.location = Some(Location::Single([[3, 7], [3, 20]]));
        InterpretedResult {
            status: Status::Failure,
            data: InterpretedPayload {
                warnings: vec!["scanner hiccup".into()],
                dependencies: InterpretedDependencies {
                    warnings: vec![DependencyWarningWithMode {
                        package: "express".into(),
                        warnings: vec![
                            ModedWarning {
                                warning: located,
                                mode: WarningMode::Blocking,
                            },
                            ModedWarning {
                                warning: RawWarning::new("unsafe-import"),
                                mode: WarningMode::Advisory,
                            },
                        ],
                    }],
                    vulnerabilities: vec![Vulnerability {
                        origin: "github-advisory".into(),
                        package: Some("marker".into()),
                        title: Some("Prototype pollution".into()),
                        severity: Some(Severity::High),
                        vulnerable_ranges: vec!["<1.2.3".into()],
                        ..Vulnerability::default()
                    }],
                },
            },
        }
    }

    #[test]
    fn test_outcome_stats_line_counts() {
        let res = sample_result();
        assert_eq!(
            outcome_stats_line(&res, &WarningPolicy::default()),
            "1 global warning | 2 dependency warnings | 1 vulnerability"
        );
        assert_eq!(
            outcome_stats_line(&res, &WarningPolicy::Uniform(WarningMode::Off)),
            "1 global warning | dependency warnings skipped | 1 vulnerability"
        );
    }

    #[test]
    fn test_render_human_plain() {
        let out = render_human(&sample_result(), &Configuration::default(), false);
        assert!(out.contains("✖ [error] obfuscated-code express/lib/index.js:3:7"));
        assert!(out.contains("▲ [warning] unsafe-import express\n"));
        assert!(out.contains("Vulnerabilities (GITHUB-ADVISORY)"));
        assert!(out.contains("✖ [high] marker Prototype pollution (<1.2.3)"));
        assert!(out.ends_with("[FAILURE] Pipeline failed\n"));
    }

    #[test]
    fn test_render_human_success_without_findings() {
        let res = InterpretedResult {
            status: Status::Success,
            data: InterpretedPayload::default(),
        };
        let out = render_human(&res, &Configuration::default(), false);
        assert_eq!(
            out,
            "0 global warnings | 0 dependency warnings | 0 vulnerabilities\n[SUCCESS] Pipeline successful\n"
        );
    }

    #[test]
    fn test_render_human_lists_every_range_start() {
        let mut literal = RawWarning::new("encoded-literal");
        literal.file = Some("src/marker.js".into());
        literal.location = Some(Location::Multiple(vec![
            [[1, 2], [1, 9]],
            [[4, 0], [4, 7]],
        ]));
        let res = InterpretedResult {
            status: Status::Failure,
            data: InterpretedPayload {
                warnings: vec![],
                dependencies: InterpretedDependencies {
                    warnings: vec![DependencyWarningWithMode {
                        package: "marker".into(),
                        warnings: vec![ModedWarning {
                            warning: literal,
                            mode: WarningMode::Blocking,
                        }],
                    }],
                    vulnerabilities: vec![],
                },
            },
        };
        let out = render_human(&res, &Configuration::default(), false);
        assert!(out.contains("✖ [error] encoded-literal marker/src/marker.js:1:2,4:0"));
    }

    #[test]
    fn test_compose_result_json_shape() {
        let out = compose_result_json(&sample_result()).unwrap();
        assert_eq!(out["status"], "failure");
        assert_eq!(out["data"]["warnings"][0], "scanner hiccup");
        let w = &out["data"]["dependencies"]["warnings"][0];
        assert_eq!(w["package"], "express");
        assert_eq!(w["warnings"][0]["kind"], "obfuscated-code");
        assert_eq!(w["warnings"][0]["mode"], "error");
        assert_eq!(w["warnings"][1]["mode"], "warning");
        assert_eq!(
            out["data"]["dependencies"]["vulnerabilities"][0]["severity"],
            "high"
        );
    }
}
