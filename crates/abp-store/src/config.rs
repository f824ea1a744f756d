//! Store configuration.

use abp_audit::AuditConfig;
use serde::{Deserialize, Serialize};

/// Store configuration, loadable from TOML.
///
/// ```toml
/// default_page_size = 25
///
/// [audit]
/// ignored_attributes = ["updated_at"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    #[serde(default)]
    pub audit: AuditConfig,
}

const fn default_page_size() -> usize {
    25
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            audit: AuditConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Parse from TOML.
    ///
    /// # Errors
    /// Returns the parse error for malformed TOML.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }
}
