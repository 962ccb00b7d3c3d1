//! Path management for balance-cli
//!
//! ## Path Resolution Order
//!
//! 1. `BALANCE_CLI_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/balance-cli` or `~/.config/balance-cli`
//! 3. Windows: `%APPDATA%\balance-cli`

use std::path::PathBuf;

use crate::error::BalanceError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "BALANCE_CLI_DATA_DIR";

/// Manages all paths used by balance-cli
#[derive(Debug, Clone)]
pub struct BalancePaths {
    base_dir: PathBuf,
}

impl BalancePaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if neither the override nor a home/appdata
    /// directory is available.
    pub fn new() -> Result<Self, BalanceError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Use an explicit base directory
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the default data files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Default transactions file when neither the flag nor settings name one
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.csv")
    }

    pub fn goals_file(&self) -> PathBuf {
        self.data_dir().join("goals.yaml")
    }

    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.yaml")
    }

    pub fn debts_file(&self) -> PathBuf {
        self.data_dir().join("debts.yaml")
    }

    /// Create the base and data directories
    pub fn ensure_directories(&self) -> Result<(), BalanceError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BalanceError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| BalanceError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Whether `balance init` has run here
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BalanceError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                BalanceError::Config(format!(
                    "Could not determine home directory; set {} or HOME",
                    DATA_DIR_ENV
                ))
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("balance-cli"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BalanceError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BalanceError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("balance-cli"))
}
