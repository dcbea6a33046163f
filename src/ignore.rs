//! Ignore rules: `(warning kind, package)` pairs exempted by the user.
//!
//! Rules are read from `<root>/.scangateignore`:
//!
//! ```json
//! { "warnings": { "unsafe-stmt": ["express"], "obfuscated-code": ["marker"] } }
//! ```
//!
//! The filter is coarse-grained: a dependency entry is dropped as a whole when
//! any of its warnings matches a rule for that package.

use crate::error::IgnoreFileError;
use crate::models::DependencyWarning;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const IGNORE_FILE_NAME: &str = ".scangateignore";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
/// On-disk shape of the ignore file.
pub struct IgnoreFile {
    #[serde(default)]
    pub warnings: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Immutable lookup table: warning kind -> exempt packages.
pub struct IgnorePatterns {
    warnings: BTreeMap<String, BTreeSet<String>>,
}

impl IgnorePatterns {
    pub fn new<K, P, I>(entries: impl IntoIterator<Item = (K, I)>) -> Self
    where
        K: Into<String>,
        P: Into<String>,
        I: IntoIterator<Item = P>,
    {
        let mut warnings: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (kind, packages) in entries {
            warnings
                .entry(kind.into())
                .or_default()
                .extend(packages.into_iter().map(Into::into));
        }
        Self { warnings }
    }

    pub fn is_ignored(&self, kind: &str, package: &str) -> bool {
        self.warnings
            .get(kind)
            .is_some_and(|packages| packages.contains(package))
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.values().all(BTreeSet::is_empty)
    }

    /// Number of `(kind, package)` rules.
    pub fn len(&self) -> usize {
        self.warnings.values().map(BTreeSet::len).sum()
    }
}

impl From<IgnoreFile> for IgnorePatterns {
    fn from(file: IgnoreFile) -> Self {
        Self::new(file.warnings)
    }
}

/// Load ignore rules from `dir`. A missing file yields empty patterns.
pub fn load_ignore_file(dir: &Path) -> Result<IgnorePatterns, IgnoreFileError> {
    let path = dir.join(IGNORE_FILE_NAME);
    let raw = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(IgnorePatterns::default()),
        Err(source) => return Err(IgnoreFileError::Read { path, source }),
    };
    let file: IgnoreFile =
        serde_json::from_str(&raw).map_err(|source| IgnoreFileError::Parse { path, source })?;
    Ok(file.into())
}

/// Drop every dependency that has at least one warning ignored for its
/// package. Identity when no rules are registered.
pub fn exclude_ignored(
    dependencies: Vec<DependencyWarning>,
    patterns: &IgnorePatterns,
) -> Vec<DependencyWarning> {
    if patterns.is_empty() {
        return dependencies;
    }
    dependencies
        .into_iter()
        .filter(|dep| {
            let ignored = dep
                .warnings
                .iter()
                .any(|w| patterns.is_ignored(&w.kind, &dep.package));
            if ignored {
                tracing::debug!(package = %dep.package, "dependency warnings ignored by rule");
            }
            !ignored
        })
        .collect()
}
