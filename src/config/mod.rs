//! Configuration module for balance-cli
//!
//! Path resolution for the config directory and persisted user settings.

pub mod paths;
pub mod settings;

pub use paths::BalancePaths;
pub use settings::Settings;
