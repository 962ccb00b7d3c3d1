//! Monthly Summary Report
//!
//! Income, expense, net and savings rate for every month with activity.

use std::io::Write;

use tabled::Tabled;

use crate::error::BalanceResult;
use crate::models::{Money, MonthlyBalance, Transaction};
use crate::services::aggregate_monthly_balances;

use super::{csv_writer, export_error, percent, render_table};

/// Monthly Summary Report
#[derive(Debug, Clone)]
pub struct MonthlySummaryReport {
    /// One entry per month, oldest first
    pub months: Vec<MonthlyBalance>,
    pub total_income: Money,
    pub total_expense: Money,
}

/// A month as shown in the terminal table
#[derive(Debug, Clone, Tabled)]
pub struct MonthlySummaryRow {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Income")]
    pub income: String,
    #[tabled(rename = "Expense")]
    pub expense: String,
    #[tabled(rename = "Net")]
    pub net: String,
    #[tabled(rename = "Savings rate")]
    pub savings_rate: String,
}

impl MonthlySummaryReport {
    pub fn generate(transactions: &[Transaction]) -> Self {
        Self::from_balances(aggregate_monthly_balances(transactions))
    }

    pub fn from_balances(months: Vec<MonthlyBalance>) -> Self {
        let total_income = months.iter().map(|m| m.income).sum();
        let total_expense = months.iter().map(|m| m.expense).sum();

        Self {
            months,
            total_income,
            total_expense,
        }
    }

    pub fn total_net(&self) -> Money {
        self.total_income - self.total_expense
    }

    /// Savings rate over the whole period, rounded to 3 decimals
    pub fn overall_savings_rate(&self) -> f64 {
        if !self.total_income.is_positive() {
            return 0.0;
        }
        let rate = self.total_net().cents() as f64 / self.total_income.cents() as f64;
        (rate * 1000.0).round() / 1000.0
    }

    pub fn rows(&self, currency: &str) -> Vec<MonthlySummaryRow> {
        let mut rows: Vec<MonthlySummaryRow> = self
            .months
            .iter()
            .map(|m| MonthlySummaryRow {
                month: m.month.to_string(),
                income: m.income.format_with_symbol(currency),
                expense: m.expense.format_with_symbol(currency),
                net: m.net().format_with_symbol(currency),
                savings_rate: percent(m.savings_rate() * 100.0),
            })
            .collect();

        if !self.months.is_empty() {
            rows.push(MonthlySummaryRow {
                month: "TOTAL".to_string(),
                income: self.total_income.format_with_symbol(currency),
                expense: self.total_expense.format_with_symbol(currency),
                net: self.total_net().format_with_symbol(currency),
                savings_rate: percent(self.overall_savings_rate() * 100.0),
            });
        }

        rows
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        if self.months.is_empty() {
            return "Monthly Summary\n\nNo transactions.\n".to_string();
        }

        format!("Monthly Summary\n{}\n", render_table(self.rows(currency)))
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BalanceResult<()> {
        let mut csv = csv_writer(writer);
        csv.write_record(["Month", "Income", "Expense", "Net", "Savings Rate"])
            .map_err(export_error)?;

        for m in &self.months {
            csv.write_record([
                m.month.to_string(),
                m.income.to_string(),
                m.expense.to_string(),
                m.net().to_string(),
                format!("{:.3}", m.savings_rate()),
            ])
            .map_err(export_error)?;
        }

        csv.write_record([
            "TOTAL".to_string(),
            self.total_income.to_string(),
            self.total_expense.to_string(),
            self.total_net().to_string(),
            format!("{:.3}", self.overall_savings_rate()),
        ])
        .map_err(export_error)?;

        csv.flush().map_err(export_error)?;
        Ok(())
    }
}
