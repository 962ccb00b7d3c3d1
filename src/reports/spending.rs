//! Spending Report
//!
//! Expense totals by category over an optional range of months.

use std::collections::HashMap;
use std::io::Write;

use tabled::Tabled;

use crate::error::BalanceResult;
use crate::models::{Money, MonthKey, Transaction};

use super::{csv_writer, export_error, percent, render_table};

/// Label used for expenses recorded without a category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Spending breakdown for one category
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingByCategory {
    pub category: String,
    pub total_spending: Money,
    pub transaction_count: usize,
    /// Percentage of total spending
    pub percentage: f64,
}

#[derive(Tabled)]
struct SpendingRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "%")]
    percentage: String,
}

/// Spending Report
#[derive(Debug, Clone)]
pub struct SpendingReport {
    /// First month included, `None` for no lower bound
    pub from: Option<MonthKey>,
    /// Last month included, `None` for no upper bound
    pub to: Option<MonthKey>,
    /// Categories, highest spending first
    pub categories: Vec<SpendingByCategory>,
    pub total_spending: Money,
    pub total_income: Money,
    /// Transactions inside the range
    pub total_transactions: usize,
}

impl SpendingReport {
    /// Generate a spending report for the months `from..=to`
    pub fn generate(
        transactions: &[Transaction],
        from: Option<MonthKey>,
        to: Option<MonthKey>,
    ) -> Self {
        let in_range = |txn: &&Transaction| {
            let month = txn.month();
            from.map_or(true, |f| month >= f) && to.map_or(true, |t| month <= t)
        };

        // Keyed case-insensitively; the first spelling seen is displayed
        let mut by_category: HashMap<String, SpendingByCategory> = HashMap::new();
        let mut total_spending = Money::zero();
        let mut total_income = Money::zero();
        let mut total_transactions = 0;

        for txn in transactions.iter().filter(in_range) {
            total_transactions += 1;

            if txn.is_income() {
                total_income += txn.amount;
                continue;
            }

            let name = match txn.category.trim() {
                "" => UNCATEGORIZED,
                name => name,
            };
            let entry = by_category
                .entry(name.to_lowercase())
                .or_insert_with(|| SpendingByCategory {
                    category: name.to_string(),
                    total_spending: Money::zero(),
                    transaction_count: 0,
                    percentage: 0.0,
                });
            entry.total_spending += txn.amount;
            entry.transaction_count += 1;
            total_spending += txn.amount;
        }

        let mut categories: Vec<SpendingByCategory> = by_category
            .into_values()
            .map(|mut c| {
                c.percentage = c.total_spending.percent_of(total_spending);
                c
            })
            .collect();

        categories.sort_by(|a, b| {
            b.total_spending
                .cmp(&a.total_spending)
                .then_with(|| a.category.cmp(&b.category))
        });

        Self {
            from,
            to,
            categories,
            total_spending,
            total_income,
            total_transactions,
        }
    }

    /// The `limit` categories with the most spending
    pub fn top(&self, limit: usize) -> &[SpendingByCategory] {
        &self.categories[..limit.min(self.categories.len())]
    }

    /// Keep only the top `limit` categories
    pub fn truncate(&mut self, limit: usize) {
        self.categories.truncate(limit);
    }

    fn range_label(&self) -> String {
        match (self.from, self.to) {
            (None, None) => "all months".to_string(),
            (Some(f), None) => format!("from {}", f),
            (None, Some(t)) => format!("through {}", t),
            (Some(f), Some(t)) if f == t => f.to_string(),
            (Some(f), Some(t)) => format!("{} to {}", f, t),
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = format!("Spending Report: {}\n", self.range_label());
        output.push_str(&format!(
            "Total Spending: {}\n",
            self.total_spending.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "Total Income: {}\n",
            self.total_income.format_with_symbol(currency)
        ));
        output.push_str(&format!("Total Transactions: {}\n", self.total_transactions));

        if self.categories.is_empty() {
            output.push_str("\nNo spending in this period.\n");
            return output;
        }

        let rows = self.categories.iter().map(|c| SpendingRow {
            category: c.category.clone(),
            amount: c.total_spending.format_with_symbol(currency),
            count: c.transaction_count,
            percentage: percent(c.percentage),
        });
        output.push_str(&render_table(rows));
        output.push('\n');
        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BalanceResult<()> {
        let from = self.from.map(|m| m.to_string()).unwrap_or_default();
        let to = self.to.map(|m| m.to_string()).unwrap_or_default();

        let mut csv = csv_writer(writer);
        csv.write_record(["From", "To", "Category", "Amount", "Transaction Count", "Percentage"])
            .map_err(export_error)?;

        for c in &self.categories {
            csv.write_record([
                from.clone(),
                to.clone(),
                c.category.clone(),
                c.total_spending.to_string(),
                c.transaction_count.to_string(),
                format!("{:.2}", c.percentage),
            ])
            .map_err(export_error)?;
        }

        csv.write_record([
            from,
            to,
            "TOTAL".to_string(),
            self.total_spending.to_string(),
            self.categories
                .iter()
                .map(|c| c.transaction_count)
                .sum::<usize>()
                .to_string(),
            "100.00".to_string(),
        ])
        .map_err(export_error)?;

        csv.flush().map_err(export_error)?;
        Ok(())
    }
}
