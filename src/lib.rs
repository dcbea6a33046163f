//! Scangate core library.
//!
//! This crate evaluates the result of a dependency security scan against a
//! user policy and decides whether a CI pipeline passes or fails.
//!
//! High-level modules:
//! - `models`: Scanner payload schema, policy vocabulary and result tree.
//! - `extract`: Payload compaction into flat per-package warning lists and
//!   processable vulnerabilities.
//! - `ignore`: Ignore rules and the ignore-file loader.
//! - `checks`: Global warning, dependency warning and vulnerability checks.
//! - `interpret`: Runs every check and aggregates the verdict.
//! - `config`: Discovery and effective configuration resolution.
//! - `output`: Human/JSON printers.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `error`, `logging`, `utils`: Supporting pieces.
pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod ignore;
pub mod interpret;
pub mod logging;
pub mod models;
pub mod output;
pub mod utils;
