//! Savings projection
//!
//! Ties aggregation and allocation together for a set of transactions:
//! resolves income-based targets, then runs the allocator and keeps the
//! intermediate results for reporting.

use crate::models::{Money, MonthlyBalance, SavingsGoal, Transaction};

use super::aggregator::{aggregate_monthly_balances, average_monthly_income};
use super::allocator::{allocate_savings_with_ledger, MonthAllocation};

/// Options for a projection run
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionOptions {
    /// Start every goal from zero instead of its recorded current amount
    pub from_zero: bool,
}

/// Everything produced by running the savings engine over a transaction set
#[derive(Debug, Clone)]
pub struct SavingsProjection {
    pub balances: Vec<MonthlyBalance>,
    pub average_income: Money,
    /// Goals as allocation started: income-based targets resolved
    pub starting_goals: Vec<SavingsGoal>,
    /// Goals after allocation
    pub goals: Vec<SavingsGoal>,
    pub ledger: Vec<MonthAllocation>,
}

impl SavingsProjection {
    /// Run the engine over `transactions` for `goals`
    pub fn generate(
        transactions: &[Transaction],
        goals: &[SavingsGoal],
        options: ProjectionOptions,
    ) -> Self {
        let balances = aggregate_monthly_balances(transactions);
        let average_income = average_monthly_income(&balances);

        let starting_goals: Vec<SavingsGoal> = goals
            .iter()
            .map(|goal| {
                let mut goal = resolve_target(goal, average_income);
                if options.from_zero {
                    goal.current_amount = Money::zero();
                }
                goal
            })
            .collect();

        let outcome = allocate_savings_with_ledger(&balances, &starting_goals);

        tracing::info!(
            months = balances.len(),
            goals = starting_goals.len(),
            contributed = %outcome.total_contributed(),
            discarded = %outcome.total_discarded(),
            "savings projection complete"
        );

        Self {
            balances,
            average_income,
            starting_goals,
            goals: outcome.goals,
            ledger: outcome.months,
        }
    }

    /// Total contributed across all goals
    pub fn total_contributed(&self) -> Money {
        self.ledger.iter().map(|m| m.total_contributed()).sum()
    }

    /// Total balance that could not be placed in any goal
    pub fn total_discarded(&self) -> Money {
        self.ledger.iter().map(|m| m.discarded).sum()
    }

    /// Goals whose current amount changed
    pub fn changed_goals(&self) -> impl Iterator<Item = (&SavingsGoal, &SavingsGoal)> {
        self.starting_goals
            .iter()
            .zip(&self.goals)
            .filter(|(before, after)| before.current_amount != after.current_amount)
    }
}

/// Replace an income-based target with `months × average_income`.
///
/// Goals with a fixed target are returned unchanged. An income-based goal
/// with no income history gets a zero target and so receives nothing.
pub fn resolve_target(goal: &SavingsGoal, average_income: Money) -> SavingsGoal {
    let mut goal = goal.clone();
    if let Some(months) = goal.target_months_of_income {
        goal.target_amount = average_income.times(i64::from(months));
    }
    goal
}
