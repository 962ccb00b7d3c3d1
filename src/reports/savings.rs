//! Savings Report
//!
//! Progress of every goal after a projection, and optionally the month by
//! month ledger of where each balance went.

use std::io::Write;

use tabled::Tabled;

use crate::error::BalanceResult;
use crate::models::{GoalState, Money, PriorityTier, SavingsGoal};
use crate::services::{MonthAllocation, SavingsProjection};

use super::{csv_writer, export_error, percent, render_table};

/// One goal's progress
#[derive(Debug, Clone, PartialEq)]
pub struct GoalProgressRow {
    pub goal_id: String,
    pub name: String,
    pub tier: PriorityTier,
    pub target: Money,
    pub starting: Money,
    pub current: Money,
    pub state: GoalState,
    pub percent_complete: f64,
}

impl GoalProgressRow {
    fn new(before: &SavingsGoal, after: &SavingsGoal) -> Self {
        Self {
            goal_id: after.id.to_string(),
            name: after.name.clone(),
            tier: after.priority_tier,
            target: after.target_amount,
            starting: before.current_amount,
            current: after.current_amount,
            state: after.state(),
            percent_complete: after.percent_complete(),
        }
    }

    /// Amount still needed
    pub fn remaining(&self) -> Money {
        (self.target - self.current).non_negative()
    }

    /// Amount added by this projection
    pub fn contributed(&self) -> Money {
        self.current - self.starting
    }
}

#[derive(Tabled)]
struct ProgressTableRow {
    #[tabled(rename = "Goal")]
    name: String,
    #[tabled(rename = "Tier")]
    tier: PriorityTier,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Current")]
    current: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Progress")]
    progress: String,
    #[tabled(rename = "Added")]
    added: String,
    #[tabled(rename = "State")]
    state: GoalState,
}

#[derive(Tabled)]
struct LedgerTableRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Contributions")]
    contributions: String,
    #[tabled(rename = "Discarded")]
    discarded: String,
}

/// Savings Report
#[derive(Debug, Clone)]
pub struct SavingsReport {
    pub goals: Vec<GoalProgressRow>,
    pub ledger: Vec<MonthAllocation>,
    pub average_income: Money,
    pub total_contributed: Money,
    pub total_discarded: Money,
}

impl SavingsReport {
    pub fn generate(projection: &SavingsProjection) -> Self {
        let goals = projection
            .starting_goals
            .iter()
            .zip(&projection.goals)
            .map(|(before, after)| GoalProgressRow::new(before, after))
            .collect();

        Self {
            goals,
            ledger: projection.ledger.clone(),
            average_income: projection.average_income,
            total_contributed: projection.total_contributed(),
            total_discarded: projection.total_discarded(),
        }
    }

    /// Format the goal table, plus the ledger when `with_ledger` is set
    pub fn format_terminal(&self, currency: &str, with_ledger: bool) -> String {
        let money = |m: Money| m.format_with_symbol(currency);
        let mut output = String::from("Savings Goals\n");

        if self.goals.is_empty() {
            output.push_str("\nNo savings goals configured.\n");
            return output;
        }

        let rows = self.goals.iter().map(|g| ProgressTableRow {
            name: g.name.clone(),
            tier: g.tier,
            target: money(g.target),
            current: money(g.current),
            remaining: money(g.remaining()),
            progress: percent(g.percent_complete),
            added: money(g.contributed()),
            state: g.state,
        });
        output.push_str(&render_table(rows));
        output.push('\n');

        output.push_str(&format!("Average monthly income: {}\n", money(self.average_income)));
        output.push_str(&format!("Contributed: {}\n", money(self.total_contributed)));
        if !self.total_discarded.is_zero() {
            output.push_str(&format!("Unallocated: {}\n", money(self.total_discarded)));
        }

        if with_ledger {
            output.push_str("\nMonthly Allocation\n");
            if self.ledger.is_empty() {
                output.push_str("No months with a positive balance.\n");
            } else {
                let rows = self.ledger.iter().map(|m| LedgerTableRow {
                    month: m.month.to_string(),
                    balance: money(m.balance),
                    contributions: m
                        .contributions
                        .iter()
                        .map(|c| format!("{}: {}", c.goal_id, money(c.amount)))
                        .collect::<Vec<_>>()
                        .join("\n"),
                    discarded: money(m.discarded),
                });
                output.push_str(&render_table(rows));
                output.push('\n');
            }
        }

        output
    }

    /// Export goal progress to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BalanceResult<()> {
        let mut csv = csv_writer(writer);
        csv.write_record([
            "Goal ID",
            "Name",
            "Tier",
            "Target",
            "Starting",
            "Current",
            "Remaining",
            "Percent Complete",
            "State",
        ])
        .map_err(export_error)?;

        for g in &self.goals {
            csv.write_record([
                g.goal_id.clone(),
                g.name.clone(),
                g.tier.to_string(),
                g.target.to_string(),
                g.starting.to_string(),
                g.current.to_string(),
                g.remaining().to_string(),
                format!("{:.2}", g.percent_complete),
                g.state.to_string(),
            ])
            .map_err(export_error)?;
        }

        csv.flush().map_err(export_error)?;
        Ok(())
    }

    /// Export the ledger as one row per month and goal contribution.
    /// Discarded balance appears as a row with an empty goal ID.
    pub fn export_ledger_csv<W: Write>(&self, writer: &mut W) -> BalanceResult<()> {
        let mut csv = csv_writer(writer);
        csv.write_record(["Month", "Balance", "Goal ID", "Amount"])
            .map_err(export_error)?;

        for m in &self.ledger {
            let month = m.month.to_string();
            let balance = m.balance.to_string();
            for c in &m.contributions {
                csv.write_record([
                    month.as_str(),
                    balance.as_str(),
                    c.goal_id.as_str(),
                    &c.amount.to_string(),
                ])
                .map_err(export_error)?;
            }
            if !m.discarded.is_zero() {
                csv.write_record([month.as_str(), balance.as_str(), "", &m.discarded.to_string()])
                    .map_err(export_error)?;
            }
        }

        csv.flush().map_err(export_error)?;
        Ok(())
    }
}
