//! Error types for the I/O-facing layers (payload, config, ignore file).
//!
//! The evaluators themselves never fail; a failing gate is a `Status`, not
//! an error.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading `.scangateignore`.
#[derive(Error, Debug)]
pub enum IgnoreFileError {
    #[error("Failed to read ignore file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid ignore file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while reading a `scangate.{toml,yaml,yml}` file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config file {} is not valid TOML: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config file {} is not valid YAML: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Top-level error surfaced by the binary.
#[derive(Error, Debug)]
pub enum GateError {
    #[error("Failed to read scanner payload: {}", path.display())]
    PayloadRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scanner payload {} is not valid JSON: {source}", path.display())]
    PayloadParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Refusing to overwrite existing config: {} (pass --force)", .0.display())]
    ConfigExists(PathBuf),

    #[error("Failed to write config file: {}", path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    IgnoreFile(#[from] IgnoreFileError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GateError>;
