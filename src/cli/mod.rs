//! CLI command handlers
//!
//! Bridges the clap argument structs with the reports, the savings engine
//! and debt tracking.

pub mod config;
pub mod debts;
pub mod report;
pub mod savings;

pub use config::{handle_config_command, handle_init_command, InitArgs};
pub use debts::{handle_amortize_command, handle_debts_command, AmortizeArgs, DebtsArgs};
pub use report::{
    handle_budget_command, handle_spending_command, handle_summary_command, BudgetArgs,
    SpendingArgs, SummaryArgs, TransactionsArg,
};
pub use savings::{handle_savings_command, SavingsArgs};
