//! Monthly balance model
//!
//! Income and expense totals for one calendar month, derived from
//! transactions and never stored.

use serde::{Deserialize, Serialize};

use super::money::Money;
use super::month::MonthKey;

/// Totals for one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBalance {
    pub month: MonthKey,
    pub income: Money,
    pub expense: Money,
}

impl MonthlyBalance {
    pub fn new(month: MonthKey, income: Money, expense: Money) -> Self {
        Self {
            month,
            income,
            expense,
        }
    }

    pub fn empty(month: MonthKey) -> Self {
        Self::new(month, Money::zero(), Money::zero())
    }

    /// Income minus expense; negative when the month overspent
    pub fn net(&self) -> Money {
        self.income - self.expense
    }

    /// Net as a fraction of income, rounded to 3 decimals (0 without income)
    pub fn savings_rate(&self) -> f64 {
        if !self.income.is_positive() {
            return 0.0;
        }
        let rate = self.net().cents() as f64 / self.income.cents() as f64;
        (rate * 1000.0).round() / 1000.0
    }
}
