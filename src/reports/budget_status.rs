//! Budget Status Report
//!
//! Budget against actual spending for each budgeted category in one month.

use std::collections::HashMap;
use std::io::Write;

use tabled::Tabled;

use crate::error::BalanceResult;
use crate::models::{budgets_for_month, CategoryBudget, Money, MonthKey, Transaction};

use super::{csv_writer, export_error, percent, render_table};

/// One budgeted category
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatusRow {
    pub category: String,
    pub budgeted: Money,
    pub spent: Money,
    /// Set for this month specifically rather than by a template
    pub month_specific: bool,
}

impl BudgetStatusRow {
    /// Budget left; negative when overspent
    pub fn remaining(&self) -> Money {
        self.budgeted - self.spent
    }

    pub fn percent_used(&self) -> f64 {
        self.spent.percent_of(self.budgeted)
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.budgeted
    }
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Budgeted")]
    budgeted: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

/// Budget Status Report
#[derive(Debug, Clone)]
pub struct BudgetStatusReport {
    pub month: MonthKey,
    /// Budgeted categories, sorted by name
    pub rows: Vec<BudgetStatusRow>,
    /// Spending in categories with no budget this month
    pub unbudgeted_spending: Money,
}

impl BudgetStatusReport {
    pub fn generate(
        transactions: &[Transaction],
        budgets: &[CategoryBudget],
        month: MonthKey,
    ) -> Self {
        let mut spent_by_category: HashMap<String, Money> = HashMap::new();
        for txn in transactions
            .iter()
            .filter(|t| t.is_expense() && t.month() == month)
        {
            *spent_by_category
                .entry(txn.category.trim().to_lowercase())
                .or_default() += txn.amount;
        }

        let rows: Vec<BudgetStatusRow> = budgets_for_month(budgets, month)
            .into_iter()
            .map(|budget| {
                let spent = spent_by_category
                    .remove(&budget.category.trim().to_lowercase())
                    .unwrap_or_default();
                BudgetStatusRow {
                    month_specific: !budget.is_template(),
                    category: budget.category,
                    budgeted: budget.amount,
                    spent,
                }
            })
            .collect();

        Self {
            month,
            rows,
            unbudgeted_spending: spent_by_category.into_values().sum(),
        }
    }

    pub fn total_budgeted(&self) -> Money {
        self.rows.iter().map(|r| r.budgeted).sum()
    }

    pub fn total_spent(&self) -> Money {
        self.rows.iter().map(|r| r.spent).sum()
    }

    pub fn over_budget(&self) -> impl Iterator<Item = &BudgetStatusRow> {
        self.rows.iter().filter(|r| r.is_over_budget())
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = format!("Budget Status: {}\n", self.month);

        if self.rows.is_empty() {
            output.push_str("\nNo budgets for this month.\n");
        } else {
            let rows = self.rows.iter().map(|r| StatusRow {
                category: r.category.clone(),
                budgeted: r.budgeted.format_with_symbol(currency),
                spent: r.spent.format_with_symbol(currency),
                remaining: r.remaining().format_with_symbol(currency),
                used: percent(r.percent_used()),
                status: if r.is_over_budget() { "OVER" } else { "ok" },
            });
            output.push_str(&render_table(rows));
            output.push('\n');
            output.push_str(&format!(
                "Total: {} spent of {} budgeted\n",
                self.total_spent().format_with_symbol(currency),
                self.total_budgeted().format_with_symbol(currency)
            ));
        }

        let over = self.over_budget().count();
        if over > 0 {
            output.push_str(&format!("{} categor{} over budget\n", over, if over == 1 { "y" } else { "ies" }));
        }

        if !self.unbudgeted_spending.is_zero() {
            output.push_str(&format!(
                "Unbudgeted spending: {}\n",
                self.unbudgeted_spending.format_with_symbol(currency)
            ));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BalanceResult<()> {
        let month = self.month.to_string();
        let mut csv = csv_writer(writer);
        csv.write_record([
            "Month",
            "Category",
            "Budgeted",
            "Spent",
            "Remaining",
            "Percent Used",
            "Over Budget",
        ])
        .map_err(export_error)?;

        for r in &self.rows {
            csv.write_record([
                month.clone(),
                r.category.clone(),
                r.budgeted.to_string(),
                r.spent.to_string(),
                r.remaining().to_string(),
                format!("{:.2}", r.percent_used()),
                r.is_over_budget().to_string(),
            ])
            .map_err(export_error)?;
        }

        csv.flush().map_err(export_error)?;
        Ok(())
    }
}
