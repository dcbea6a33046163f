//! Warning checks: scanner-level global warnings and per-dependency warnings
//! resolved against the active `WarningPolicy`.

use crate::checks::{CheckData, CheckOutcome};
use crate::models::policy::{WarningMode, WarningPolicy};
use crate::models::{DependencyWarning, DependencyWarningWithMode, ModedWarning};

/// Any global warning fails the gate.
pub fn check_global_warnings(warnings: &[String]) -> CheckOutcome {
    CheckOutcome::fail_if(
        !warnings.is_empty(),
        CheckData::GlobalWarnings(warnings.to_vec()),
    )
}

/// Resolve a mode for every dependency warning and decide whether any of
/// them is blocking.
///
/// - `Uniform(Off)`: nothing is reported, always passes.
/// - `Uniform(Blocking|Advisory)`: dependencies with at least one warning are
///   kept with every warning annotated; only `Blocking` can fail.
/// - `PerKind`: each warning resolved by kind (absent kinds are `Off`), `Off`
///   warnings dropped, then dependencies left empty dropped. Fails iff a
///   surviving warning is `Blocking`.
pub fn check_dependencies_warnings(
    dependencies: &[DependencyWarning],
    policy: &WarningPolicy,
) -> CheckOutcome {
    match policy {
        WarningPolicy::Uniform(WarningMode::Off) => {
            CheckOutcome::pass(CheckData::DependencyWarnings(Vec::new()))
        }
        WarningPolicy::Uniform(mode) => with_shared_mode(dependencies, *mode),
        WarningPolicy::PerKind(_) => with_specific_modes(dependencies, policy),
    }
}

fn with_shared_mode(dependencies: &[DependencyWarning], mode: WarningMode) -> CheckOutcome {
    let annotated: Vec<DependencyWarningWithMode> = dependencies
        .iter()
        .filter(|dep| !dep.warnings.is_empty())
        .map(|dep| DependencyWarningWithMode {
            package: dep.package.clone(),
            warnings: dep
                .warnings
                .iter()
                .map(|w| ModedWarning {
                    warning: w.clone(),
                    mode,
                })
                .collect(),
        })
        .collect();

    let failing = mode == WarningMode::Blocking && !annotated.is_empty();
    CheckOutcome::fail_if(failing, CheckData::DependencyWarnings(annotated))
}

fn with_specific_modes(dependencies: &[DependencyWarning], policy: &WarningPolicy) -> CheckOutcome {
    let mut blocking = 0usize;
    let mut annotated = Vec::with_capacity(dependencies.len());

    for dep in dependencies {
        let warnings: Vec<ModedWarning> = dep
            .warnings
            .iter()
            .filter_map(|w| match policy.mode_for(&w.kind) {
                WarningMode::Off => None,
                mode => {
                    if mode == WarningMode::Blocking {
                        blocking += 1;
                    }
                    Some(ModedWarning {
                        warning: w.clone(),
                        mode,
                    })
                }
            })
            .collect();
        if warnings.is_empty() {
            continue;
        }
        annotated.push(DependencyWarningWithMode {
            package: dep.package.clone(),
            warnings,
        });
    }

    CheckOutcome::fail_if(blocking > 0, CheckData::DependencyWarnings(annotated))
}
