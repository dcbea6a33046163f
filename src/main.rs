//! Scangate CLI binary entry point.
//! Resolves configuration, runs the interpreter and maps the verdict to an
//! exit code: 0 success, 1 pipeline failure, 2 usage or I/O error.

use clap::Parser;
use scangate::cli::{Cli, Commands, IgnoreCmd, PolicyArgs};
use scangate::config::{self, CliOverrides};
use scangate::error::Result;
use scangate::ignore::{load_ignore_file, IGNORE_FILE_NAME};
use scangate::interpret::{load_payload, run_payload_interpreter};
use scangate::models::policy::ReporterTarget;
use scangate::utils::{error_prefix, info_prefix, note_prefix};
use scangate::{logging, output};
use std::path::{Path, PathBuf};

fn main() {
    logging::init_tracing();
    let cli = Cli::parse();
    let code = match run(cli.cmd) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", error_prefix(), e);
            2
        }
    };
    std::process::exit(code);
}

fn run(cmd: Commands) -> Result<i32> {
    match cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
        Commands::Check {
            payload,
            repo_root,
            output,
            policy,
        } => run_check(Path::new(&payload), repo_root, output, policy),
        Commands::Init { repo_root, force } => {
            let start = PathBuf::from(repo_root.as_deref().unwrap_or("."));
            let root = config::detect_repo_root(&start);
            let path = config::write_default_config(&root, force)?;
            eprintln!("{} Created {}", info_prefix(), path.display());
            Ok(0)
        }
        Commands::Ignore {
            cmd: IgnoreCmd::Validate {
                repo_root,
                directory,
            },
        } => {
            let eff = config::resolve_effective(&CliOverrides {
                repo_root,
                directory,
                ..CliOverrides::default()
            });
            let dir = &eff.configuration.root_dir;
            let patterns = load_ignore_file(dir)?;
            eprintln!(
                "{} {} is valid ({} rules)",
                info_prefix(),
                dir.join(IGNORE_FILE_NAME).display(),
                patterns.len()
            );
            Ok(0)
        }
    }
}

fn run_check(
    payload: &Path,
    repo_root: Option<String>,
    output: Option<String>,
    policy: PolicyArgs,
) -> Result<i32> {
    let eff = config::resolve_effective(&CliOverrides {
        repo_root,
        directory: policy.directory,
        strategy: policy.strategy,
        vulnerabilities: policy.vulnerabilities,
        warnings: policy.warnings,
        reporters: policy.reporters,
        output,
    });
    if eff.config_file.is_none() && eff.output != "json" {
        eprintln!("{} No scangate.toml found; using defaults.", note_prefix());
    }

    let scan = load_payload(payload)?;
    let cfg = &eff.configuration;
    let result = run_payload_interpreter(&scan, cfg);

    if eff.output == "json" {
        output::print_result(&result, cfg, &eff.output)?;
    } else {
        if cfg.reporters.is_empty() {
            tracing::warn!("no reporter configured; result not printed");
        }
        for reporter in &cfg.reporters {
            match reporter {
                ReporterTarget::Console => output::print_result(&result, cfg, &eff.output)?,
                ReporterTarget::Html => {
                    tracing::warn!(reporter = reporter.as_str(), "reporter not available; skipped")
                }
            }
        }
    }

    Ok(if result.status.is_success() { 0 } else { 1 })
}
