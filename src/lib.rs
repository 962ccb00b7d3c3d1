//! balance-cli - shared household finances with savings-goal allocation
//!
//! Reads a couple's income and expense history, folds it into monthly
//! balances, and distributes each month's surplus across prioritized savings
//! goals: the tier 1 goal first, up to its monthly cap, then the tier 2 goals
//! in equal shares with overflow passed on to the goals still funding.
//!
//! # Architecture
//!
//! - `models`: money, months, transactions, goals and budgets
//! - `services`: monthly aggregation, goal allocation and projection
//! - `reports`: summary, spending, budget status and savings reports
//! - `storage`: loading and saving the data files
//! - `audit`: append-only log of goal changes
//! - `config`: paths and user settings
//! - `cli`: command handlers for the `balance` binary
//!
//! # Example
//!
//! ```rust
//! use balance::models::{Money, MonthKey, MonthlyBalance, SavingsGoal};
//! use balance::services::allocate_savings;
//!
//! let month = MonthKey::new(2025, 1).unwrap();
//! let balances = vec![MonthlyBalance::new(month, Money::from_units(5000), Money::from_units(2000))];
//! let goals = vec![
//!     SavingsGoal::priority("emergency", "Emergency", Money::from_units(10000), Money::from_units(2000)),
//!     SavingsGoal::equitable("trip", "Trip", Money::from_units(3000)),
//! ];
//!
//! let updated = allocate_savings(&balances, &goals);
//! assert_eq!(updated[0].current_amount, Money::from_units(2000));
//! assert_eq!(updated[1].current_amount, Money::from_units(1000));
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BalanceError, BalanceResult};
