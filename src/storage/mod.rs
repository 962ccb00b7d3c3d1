//! Storage layer for balance-cli
//!
//! Loads the household's transactions, goal configuration, category budgets
//! and debts from local files, and writes updated goals and debts back
//! atomically.

pub mod debts;
pub mod file_io;
pub mod goals;
pub mod transactions;

pub use debts::{load_debts, sample_debts, save_debts};
pub use file_io::{read_document, read_json, write_document_atomic, DataFormat};
pub use goals::{load_budgets, load_goals, sample_goals, save_goals, validate_goals};
pub use transactions::{load_transactions, parse_date, parse_transactions_csv};
