//! Audit trail configuration.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Volatile bookkeeping columns that never show up in diffs.
const DEFAULT_IGNORED: &[&str] = &[
    "updated_at",
    "sign_in_count",
    "current_sign_in_at",
    "last_sign_in_at",
];

/// Ignore-list configuration, loadable from TOML.
///
/// ```toml
/// ignored_attributes = ["updated_at", "sign_in_count"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_ignored")]
    ignored_attributes: BTreeSet<String>,
}

fn default_ignored() -> BTreeSet<String> {
    DEFAULT_IGNORED.iter().map(ToString::to_string).collect()
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            ignored_attributes: default_ignored(),
        }
    }
}

impl AuditConfig {
    /// Parse from TOML.
    ///
    /// # Errors
    /// Returns the parse error for malformed TOML.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }

    #[must_use]
    pub const fn ignored_attributes(&self) -> &BTreeSet<String> {
        &self.ignored_attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_covers_volatile_columns() {
        let config = AuditConfig::default();
        assert!(config.ignored_attributes().contains("updated_at"));
        assert!(config.ignored_attributes().contains("sign_in_count"));
    }

    #[test]
    fn toml_overrides_the_ignore_list() {
        let config =
            AuditConfig::from_toml_str("ignored_attributes = [\"noise\"]").expect("parse");
        assert!(config.ignored_attributes().contains("noise"));
        assert!(!config.ignored_attributes().contains("updated_at"));
    }

    #[test]
    fn empty_toml_falls_back_to_defaults() {
        let config = AuditConfig::from_toml_str("").expect("parse");
        assert_eq!(config, AuditConfig::default());
    }
}
