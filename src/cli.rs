//! CLI argument parsing via `clap`.

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "scangate",
    version,
    about = "Scangate: CI security gate for dependency scan payloads",
    long_about = "Scangate evaluates a dependency scanner payload against a warning policy and a vulnerability severity threshold, then passes or fails the pipeline.\n\nConfiguration precedence: CLI > scangate.toml > defaults.",
    after_help = "Examples:\n  scangate check --payload scan.json\n  scangate check --payload scan.json --vulnerabilities high --warnings warning\n  scangate check --payload scan.json --output json\n  scangate init",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Debug, Default, Clone)]
/// Flags overriding `scangate.toml`.
pub struct PolicyArgs {
    #[arg(long, help = "Analysis directory relative to the repository root")]
    pub directory: Option<String>,
    #[arg(long, help = "Vulnerability strategy: github-advisory|snyk|sonatype|none")]
    pub strategy: Option<String>,
    #[arg(
        long,
        help = "Minimum failing severity: all|info|low|medium|high|critical"
    )]
    pub vulnerabilities: Option<String>,
    #[arg(long, help = "Dependency warning mode: off|warning|error")]
    pub warnings: Option<String>,
    #[arg(long, help = "Comma-separated reporters: console,html")]
    pub reporters: Option<String>,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current scangate version.")]
    Version,
    /// Evaluate a scanner payload
    #[command(
        about = "Evaluate a scanner payload",
        long_about = "Run the global warning, dependency warning and vulnerability checks over a scanner payload. Exits 1 when the pipeline fails, 2 on usage or I/O errors.",
        after_help = "Examples:\n  scangate check --payload scan.json\n  scangate check --payload scan.json --output json"
    )]
    Check {
        #[arg(long, help = "Path to the scanner payload JSON (required)")]
        payload: String,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// Write a default scangate.toml
    #[command(
        about = "Write a default config",
        long_about = "Create scangate.toml in the repository root with the default policy."
    )]
    Init {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Overwrite an existing scangate.toml")]
        force: bool,
    },
    /// Ignore file management
    Ignore {
        #[command(subcommand)]
        cmd: IgnoreCmd,
    },
}

#[derive(Subcommand)]
/// Subcommands for `scangate ignore`
pub enum IgnoreCmd {
    /// Validate .scangateignore
    #[command(
        about = "Validate ignore file",
        long_about = "Check that .scangateignore in the analysis directory is well-formed."
    )]
    Validate {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Analysis directory relative to the repository root")]
        directory: Option<String>,
    },
}
