//! Savings goal allocation
//!
//! Walks monthly balances in chronological order and spends each positive
//! month on the configured savings goals:
//!
//! 1. The tier 1 goal takes up to its monthly contribution cap, bounded by the
//!    room left before its target.
//! 2. Tier 2 goals split the rest equally. A goal that fills up passes the
//!    unused part of its share back, and the overflow is split again among the
//!    goals still funding, until nothing is left or every goal is complete.
//! 3. Whatever remains is discarded for that month.
//!
//! Allocation never mutates its input: it returns a new goal collection.
//! Amounts are whole cents, so an equal split hands the leftover cents to the
//! earliest goals in configuration order and the month's balance is conserved
//! exactly.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{GoalId, Money, MonthKey, MonthlyBalance, SavingsGoal};

/// Money applied to one goal in one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub goal_id: GoalId,
    pub amount: Money,
}

/// What happened to one month's balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthAllocation {
    pub month: MonthKey,
    /// Net balance of the month
    pub balance: Money,
    /// Non-zero contributions, in goal configuration order
    pub contributions: Vec<Contribution>,
    /// Balance no goal could absorb
    pub discarded: Money,
}

impl MonthAllocation {
    pub fn total_contributed(&self) -> Money {
        self.contributions.iter().map(|c| c.amount).sum()
    }

    /// Contribution made to a goal this month (zero if none)
    pub fn contribution_to(&self, goal_id: &GoalId) -> Money {
        self.contributions
            .iter()
            .filter(|c| &c.goal_id == goal_id)
            .map(|c| c.amount)
            .sum()
    }
}

/// Updated goals plus a ledger entry for every month that had a positive balance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationOutcome {
    pub goals: Vec<SavingsGoal>,
    pub months: Vec<MonthAllocation>,
}

impl AllocationOutcome {
    pub fn total_contributed(&self) -> Money {
        self.months.iter().map(|m| m.total_contributed()).sum()
    }

    pub fn total_discarded(&self) -> Money {
        self.months.iter().map(|m| m.discarded).sum()
    }
}

/// Result of one equal-split round over the active tier 2 goals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundOutcome {
    /// (goal index, amount) for every active goal, in active-set order
    pub contributions: Vec<(usize, Money)>,
    /// Part of the shares the goals could not absorb
    pub overflow: Money,
}

/// Allocate monthly balances to goals and return the updated goals.
///
/// `balances` must be in chronological order, as produced by
/// [`aggregate_monthly_balances`](super::aggregate_monthly_balances).
pub fn allocate_savings(balances: &[MonthlyBalance], goals: &[SavingsGoal]) -> Vec<SavingsGoal> {
    allocate_savings_with_ledger(balances, goals).goals
}

/// Allocate monthly balances to goals, keeping a per-month ledger
pub fn allocate_savings_with_ledger(
    balances: &[MonthlyBalance],
    goals: &[SavingsGoal],
) -> AllocationOutcome {
    let mut goals = goals.to_vec();
    let tier_one = priority_goal_index(&goals);
    let mut months = Vec::new();

    for balance in balances {
        let net = balance.net();
        if !net.is_positive() {
            tracing::debug!(month = %balance.month, net = %net, "skipping month without savings");
            continue;
        }

        let mut applied: BTreeMap<usize, Money> = BTreeMap::new();
        let mut remaining = net;

        if let Some(idx) = tier_one {
            let amount = priority_contribution(&goals[idx], remaining);
            if amount.is_positive() {
                goals[idx].contribute(amount);
                *applied.entry(idx).or_default() += amount;
                remaining -= amount;
            }
        }

        remaining = fund_equitably(&mut goals, remaining, &mut applied);

        let contributions: Vec<Contribution> = applied
            .into_iter()
            .filter(|(_, amount)| amount.is_positive())
            .map(|(idx, amount)| Contribution {
                goal_id: goals[idx].id.clone(),
                amount,
            })
            .collect();

        tracing::debug!(
            month = %balance.month,
            net = %net,
            contributed = %(net - remaining),
            discarded = %remaining,
            "allocated month"
        );
        if remaining.is_positive() {
            tracing::warn!(
                month = %balance.month,
                discarded = %remaining,
                "no goal could take the rest of the balance; left unallocated"
            );
        }

        months.push(MonthAllocation {
            month: balance.month,
            balance: net,
            contributions,
            discarded: remaining,
        });
    }

    AllocationOutcome { goals, months }
}

/// Index of the tier 1 goal. Only the first one configured is funded as
/// tier 1; any others receive nothing.
fn priority_goal_index(goals: &[SavingsGoal]) -> Option<usize> {
    let mut tier_one = goals
        .iter()
        .enumerate()
        .filter(|(_, goal)| goal.is_tier_one())
        .map(|(idx, _)| idx);

    let first = tier_one.next();
    let ignored: Vec<&str> = tier_one.map(|idx| goals[idx].id.as_str()).collect();
    if !ignored.is_empty() {
        tracing::warn!(
            ignored = ?ignored,
            "more than one tier 1 goal configured; only the first is funded"
        );
    }
    first
}

/// Contribution the tier 1 goal takes out of `balance`
pub fn priority_contribution(goal: &SavingsGoal, balance: Money) -> Money {
    if goal.is_complete() {
        return Money::zero();
    }
    let offered = match goal.monthly_contribution_cap {
        Some(cap) => balance.min(cap),
        None => balance,
    };
    goal.accept(offered)
}

/// One round of equitable funding.
///
/// Splits `remaining` equally across the goals at `active` and reports what
/// each would take and what overflows. Pure: `goals` is not modified.
pub fn distribute_round(goals: &[SavingsGoal], active: &[usize], remaining: Money) -> RoundOutcome {
    let shares = remaining.split_evenly(active.len());
    let mut overflow = Money::zero();

    let contributions = active
        .iter()
        .zip(shares)
        .map(|(&idx, share)| {
            let taken = goals[idx].accept(share);
            overflow += share - taken;
            (idx, taken)
        })
        .collect();

    RoundOutcome {
        contributions,
        overflow,
    }
}

/// Fund tier 2 goals from `balance`, recording amounts in `applied`.
/// Returns the part of `balance` no goal could absorb.
fn fund_equitably(
    goals: &mut [SavingsGoal],
    balance: Money,
    applied: &mut BTreeMap<usize, Money>,
) -> Money {
    let mut active: Vec<usize> = goals
        .iter()
        .enumerate()
        .filter(|(_, goal)| goal.is_tier_two() && !goal.is_complete())
        .map(|(idx, _)| idx)
        .collect();

    let mut remaining = balance;

    // Every round either uses up the balance or completes at least one goal
    while remaining.is_positive() && !active.is_empty() {
        let round = distribute_round(goals, &active, remaining);

        for (idx, amount) in round.contributions {
            if amount.is_positive() {
                goals[idx].contribute(amount);
                *applied.entry(idx).or_default() += amount;
            }
        }

        active.retain(|&idx| !goals[idx].is_complete());
        remaining = round.overflow;
    }

    remaining
}
