//! User settings for the budget wizard
//!
//! Display preferences plus the few knobs that change wizard behavior:
//! how license reductions below the contractual floor are handled and which
//! terms version new acceptances are stamped with.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::paths::WizardPaths;
use crate::error::BudgetError;
use crate::storage::file_io::{read_json_required, write_json_atomic};

/// What to do when a license request falls below the contractual floor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LicenseReductionPolicy {
    /// Refuse the selection with a contract constraint error
    #[default]
    Reject,
    /// Raise the request to the floor and keep going
    Clamp,
}

impl LicenseReductionPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Some(Self::Reject),
            "clamp" => Some(Self::Clamp),
            _ => None,
        }
    }
}

impl fmt::Display for LicenseReductionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Clamp => write!(f, "clamp"),
        }
    }
}

/// User settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol shown before amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub license_reduction_policy: LicenseReductionPolicy,

    /// Terms version stamped on acceptances when none is given
    #[serde(default = "default_terms_version")]
    pub terms_version: u32,

    /// Whether applied commands are written to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "SAR".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_terms_version() -> u32 {
    1
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            license_reduction_policy: LicenseReductionPolicy::default(),
            terms_version: default_terms_version(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &WizardPaths) -> Result<Self, BudgetError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            read_json_required(&settings_path).map_err(|e| {
                BudgetError::Config(format!("Failed to load settings file: {}", e))
            })
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &WizardPaths) -> Result<(), BudgetError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "SAR");
        assert_eq!(settings.license_reduction_policy, LicenseReductionPolicy::Reject);
        assert_eq!(settings.terms_version, 1);
        assert!(settings.audit_enabled);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WizardPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.license_reduction_policy = LicenseReductionPolicy::Clamp;
        settings.terms_version = 3;

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol":"USD"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "USD");
        assert_eq!(settings.terms_version, 1);
        assert_eq!(settings.license_reduction_policy, LicenseReductionPolicy::Reject);
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(LicenseReductionPolicy::parse("Clamp"), Some(LicenseReductionPolicy::Clamp));
        assert_eq!(LicenseReductionPolicy::parse("ignore"), None);
    }
}
