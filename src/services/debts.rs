//! Debt installments
//!
//! An expense whose category matches a debt's entity is an installment on
//! that debt ("Carro" expenses pay the car loan). Installments are applied in
//! date order; a debt with a start date ignores expenses before it.

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Debt, Money, Transaction};

/// One expense applied to a debt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DebtPayment {
    pub debt_id: String,
    pub date: NaiveDate,
    /// Expense amount
    pub amount: Money,
    /// Part of the expense that lowered the balance
    pub applied: Money,
}

/// Updated debts plus every installment that matched
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentOutcome {
    pub debts: Vec<Debt>,
    pub payments: Vec<DebtPayment>,
}

impl InstallmentOutcome {
    pub fn total_applied(&self) -> Money {
        self.payments.iter().map(|p| p.applied).sum()
    }
}

/// Apply matching expenses to debts. The input debts are not modified.
pub fn apply_installments(debts: &[Debt], transactions: &[Transaction]) -> InstallmentOutcome {
    let mut debts = debts.to_vec();
    let mut payments = Vec::new();

    let mut expenses: Vec<&Transaction> = transactions.iter().filter(|t| t.is_expense()).collect();
    expenses.sort_by_key(|t| t.date);

    for txn in expenses {
        let category = txn.category.trim();
        let Some(debt) = debts.iter_mut().find(|d| {
            d.entity.trim().eq_ignore_ascii_case(category)
                && d.start_date.map_or(true, |start| txn.date >= start)
        }) else {
            continue;
        };

        if debt.is_paid() {
            tracing::debug!(debt = %debt.id, date = %txn.date, "debt already paid; expense ignored");
            continue;
        }

        let applied = debt.pay_installment(txn.amount);
        payments.push(DebtPayment {
            debt_id: debt.id.clone(),
            date: txn.date,
            amount: txn.amount,
            applied,
        });
    }

    tracing::debug!(payments = payments.len(), "applied debt installments");
    InstallmentOutcome { debts, payments }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn car() -> Debt {
        Debt::new("car-debt-1", "Carro", Money::from_units(1000)).with_installments(3)
    }

    #[test]
    fn test_matching_expenses_pay_installments() {
        let transactions = vec![
            Transaction::expense(date("2025-02-05"), Money::from_units(400), "carro"),
            Transaction::expense(date("2025-01-05"), Money::from_units(400), "Carro"),
            Transaction::expense(date("2025-01-07"), Money::from_units(90), "Mercado"),
            Transaction::income(date("2025-01-01"), Money::from_units(400), "Carro"),
        ];

        let outcome = apply_installments(&[car()], &transactions);

        assert_eq!(outcome.payments.len(), 2);
        assert_eq!(outcome.payments[0].date, date("2025-01-05"));
        assert_eq!(outcome.debts[0].balance, Money::from_units(200));
        assert_eq!(outcome.debts[0].remaining_installments, Some(1));
        assert_eq!(outcome.total_applied(), Money::from_units(800));
    }

    #[test]
    fn test_overpayment_marks_paid_and_stops() {
        let transactions = vec![
            Transaction::expense(date("2025-01-05"), Money::from_units(700), "Carro"),
            Transaction::expense(date("2025-02-05"), Money::from_units(700), "Carro"),
            Transaction::expense(date("2025-03-05"), Money::from_units(700), "Carro"),
        ];

        let outcome = apply_installments(&[car()], &transactions);

        assert!(outcome.debts[0].is_paid());
        assert_eq!(outcome.debts[0].balance, Money::zero());
        assert_eq!(outcome.payments.len(), 2);
        assert_eq!(outcome.payments[1].applied, Money::from_units(300));
        assert_eq!(outcome.total_applied(), Money::from_units(1000));
    }

    #[test]
    fn test_expenses_before_start_date_are_ignored() {
        let debt = car().with_start_date(date("2025-02-01"));
        let transactions = vec![
            Transaction::expense(date("2025-01-05"), Money::from_units(400), "Carro"),
            Transaction::expense(date("2025-02-05"), Money::from_units(400), "Carro"),
        ];

        let outcome = apply_installments(&[debt.clone()], &transactions);

        assert_eq!(outcome.payments.len(), 1);
        assert_eq!(outcome.debts[0].balance, Money::from_units(600));
        assert_eq!(debt.balance, Money::from_units(1000));
    }
}
