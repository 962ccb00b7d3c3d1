//! Core data models for balance-cli
//!
//! Transactions, derived monthly balances, savings goals, category budgets
//! and debts.

pub mod balance;
pub mod budget;
pub mod debt;
pub mod goal;
pub mod ids;
pub mod money;
pub mod month;
pub mod transaction;

pub use balance::MonthlyBalance;
pub use budget::{budgets_for_month, CategoryBudget};
pub use debt::{Debt, DebtStatus};
pub use goal::{GoalState, PriorityTier, SavingsGoal};
pub use ids::{GoalId, RunId};
pub use money::Money;
pub use month::MonthKey;
pub use transaction::{Transaction, TransactionType};
