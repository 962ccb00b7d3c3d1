//! Monthly aggregation
//!
//! Folds a flat list of transactions into per-month income and expense
//! totals, ordered chronologically. Months without transactions do not
//! appear in the output.

use std::collections::BTreeMap;

use crate::models::{Money, MonthKey, MonthlyBalance, Transaction, TransactionType};

/// Group transactions into chronologically ordered monthly balances.
///
/// Input order does not matter. Empty input gives an empty result.
pub fn aggregate_monthly_balances(transactions: &[Transaction]) -> Vec<MonthlyBalance> {
    let mut by_month: BTreeMap<MonthKey, MonthlyBalance> = BTreeMap::new();

    for txn in transactions {
        let month = txn.month();
        let entry = by_month
            .entry(month)
            .or_insert_with(|| MonthlyBalance::empty(month));

        match txn.kind {
            TransactionType::Income => entry.income += txn.amount,
            TransactionType::Expense => entry.expense += txn.amount,
        }
    }

    tracing::debug!(
        transactions = transactions.len(),
        months = by_month.len(),
        "aggregated monthly balances"
    );

    by_month.into_values().collect()
}

/// Mean income over the months that had any income
pub fn average_monthly_income(balances: &[MonthlyBalance]) -> Money {
    let earning: Vec<Money> = balances
        .iter()
        .map(|b| b.income)
        .filter(|income| income.is_positive())
        .collect();

    if earning.is_empty() {
        return Money::zero();
    }

    let total: Money = earning.iter().sum();
    let count = earning.len() as i64;
    // Round half up to the nearest cent
    Money::from_cents((total.cents() * 2 + count) / (count * 2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_monthly_balances(&[]).is_empty());
    }

    #[test]
    fn test_groups_and_sorts_by_month() {
        let transactions = vec![
            Transaction::expense(date("2025-02-10"), Money::from_units(300), "Rent"),
            Transaction::income(date("2025-01-05"), Money::from_units(5000), "Salary"),
            Transaction::expense(date("2025-01-20"), Money::from_units(3000), "Rent"),
            Transaction::income(date("2024-12-31"), Money::from_units(100), "Gift"),
            Transaction::expense(date("2025-01-21"), Money::from_cents(50), "Coffee"),
        ];

        let balances = aggregate_monthly_balances(&transactions);
        let months: Vec<String> = balances.iter().map(|b| b.month.to_string()).collect();
        assert_eq!(months, vec!["2024-12", "2025-01", "2025-02"]);

        assert_eq!(balances[1].income, Money::from_units(5000));
        assert_eq!(balances[1].expense, Money::from_cents(300_050));
        assert_eq!(balances[2].income, Money::zero());
        assert_eq!(balances[2].net(), Money::from_units(-300));
    }

    #[test]
    fn test_gap_months_are_absent() {
        let transactions = vec![
            Transaction::income(date("2025-01-05"), Money::from_units(10), "Salary"),
            Transaction::income(date("2025-04-05"), Money::from_units(10), "Salary"),
        ];
        let balances = aggregate_monthly_balances(&transactions);
        assert_eq!(balances.len(), 2);
    }

    #[test]
    fn test_average_income_ignores_months_without_income() {
        let transactions = vec![
            Transaction::income(date("2025-01-05"), Money::from_units(4000), "Salary"),
            Transaction::income(date("2025-02-05"), Money::from_units(5000), "Salary"),
            Transaction::expense(date("2025-03-05"), Money::from_units(100), "Food"),
        ];
        let balances = aggregate_monthly_balances(&transactions);
        assert_eq!(average_monthly_income(&balances), Money::from_units(4500));
        assert_eq!(average_monthly_income(&[]), Money::zero());
    }

    #[test]
    fn test_average_income_rounds_to_cent() {
        let transactions = vec![
            Transaction::income(date("2025-01-05"), Money::from_cents(100), "A"),
            Transaction::income(date("2025-02-05"), Money::from_cents(100), "A"),
            Transaction::income(date("2025-03-05"), Money::from_cents(101), "A"),
        ];
        let balances = aggregate_monthly_balances(&transactions);
        // 301 / 3 = 100.33 -> 100
        assert_eq!(average_monthly_income(&balances), Money::from_cents(100));
    }
}
