//! Reports module for balance-cli
//!
//! Monthly summaries, spending by category, budget status, savings progress
//! and debts. Every report renders as a terminal table and exports to CSV.

pub mod budget_status;
pub mod debts;
pub mod monthly_summary;
pub mod savings;
pub mod spending;

pub use budget_status::{BudgetStatusReport, BudgetStatusRow};
pub use debts::{DebtReport, DebtRow};
pub use monthly_summary::{MonthlySummaryReport, MonthlySummaryRow};
pub use savings::{GoalProgressRow, SavingsReport};
pub use spending::{SpendingByCategory, SpendingReport};

use std::io::Write;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::BalanceError;

/// Render rows as a rounded terminal table
pub(crate) fn render_table<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

pub(crate) fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::Writer::from_writer(writer)
}

pub(crate) fn export_error(e: impl std::fmt::Display) -> BalanceError {
    BalanceError::Export(e.to_string())
}

pub(crate) fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}
