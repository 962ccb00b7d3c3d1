//! User settings for balance-cli
//!
//! Display preferences, the date format used for CSV transactions, and
//! optional default locations for the data files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::paths::BalancePaths;
use crate::error::BalanceError;
use crate::storage::{read_json, write_document_atomic};

/// User settings for balance-cli
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used in terminal reports
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Primary date format for CSV transactions (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Months of average income the emergency fund should hold
    #[serde(default = "default_emergency_months")]
    pub emergency_months: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budgets_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debts_file: Option<PathBuf>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_emergency_months() -> u32 {
    6
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            emergency_months: default_emergency_months(),
            transactions_file: None,
            goals_file: None,
            budgets_file: None,
            debts_file: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist yet.
    /// Nothing is written; callers decide when to persist.
    pub fn load_or_create(paths: &BalancePaths) -> Result<Self, BalanceError> {
        let settings_path = paths.settings_file();

        read_json(&settings_path).map_err(|e| {
            BalanceError::Config(format!(
                "Failed to load settings from {}: {}",
                settings_path.display(),
                e
            ))
        })
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BalancePaths) -> Result<(), BalanceError> {
        paths.ensure_directories()?;
        write_document_atomic(paths.settings_file(), self)
    }

    /// Transactions file: the explicit flag, then settings, then the data dir
    pub fn transactions_path(&self, explicit: Option<&Path>, paths: &BalancePaths) -> PathBuf {
        pick(explicit, self.transactions_file.as_deref(), || paths.transactions_file())
    }

    pub fn goals_path(&self, explicit: Option<&Path>, paths: &BalancePaths) -> PathBuf {
        pick(explicit, self.goals_file.as_deref(), || paths.goals_file())
    }

    pub fn budgets_path(&self, explicit: Option<&Path>, paths: &BalancePaths) -> PathBuf {
        pick(explicit, self.budgets_file.as_deref(), || paths.budgets_file())
    }

    pub fn debts_path(&self, explicit: Option<&Path>, paths: &BalancePaths) -> PathBuf {
        pick(explicit, self.debts_file.as_deref(), || paths.debts_file())
    }
}

fn pick(explicit: Option<&Path>, configured: Option<&Path>, fallback: impl FnOnce() -> PathBuf) -> PathBuf {
    explicit
        .or(configured)
        .map(Path::to_path_buf)
        .unwrap_or_else(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.date_format, "%Y-%m-%d");
        assert_eq!(settings.emergency_months, 6);
        assert!(settings.goals_file.is_none());
    }

    #[test]
    fn test_load_missing_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BalancePaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings::load_or_create(&paths).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(!paths.settings_file().exists());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BalancePaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            currency_symbol: "€".into(),
            date_format: "%d/%m/%Y".into(),
            goals_file: Some(PathBuf::from("/srv/household/goals.json")),
            ..Settings::default()
        };
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BalancePaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"currency_symbol": "COP "}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "COP ");
        assert_eq!(loaded.emergency_months, 6);
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BalancePaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, BalanceError::Config(_)));
    }

    #[test]
    fn test_path_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BalancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut settings = Settings::default();

        assert_eq!(settings.goals_path(None, &paths), paths.goals_file());

        settings.goals_file = Some(PathBuf::from("configured.yaml"));
        assert_eq!(
            settings.goals_path(None, &paths),
            PathBuf::from("configured.yaml")
        );
        assert_eq!(
            settings.goals_path(Some(Path::new("flag.json")), &paths),
            PathBuf::from("flag.json")
        );

        assert_eq!(settings.debts_path(None, &paths), paths.debts_file());
    }
}
