//! Category budget model
//!
//! A spending limit for one expense category. A budget without a month is a
//! template that applies to every month unless a month-specific budget for the
//! same category overrides it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::month::MonthKey;

/// A monthly spending limit for a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub category: String,

    /// `None` for a template budget
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<MonthKey>,

    pub amount: Money,
}

impl CategoryBudget {
    /// A budget that applies to every month
    pub fn template(category: impl Into<String>, amount: Money) -> Self {
        Self {
            category: category.into(),
            month: None,
            amount,
        }
    }

    /// A budget for a single month
    pub fn for_month(category: impl Into<String>, month: MonthKey, amount: Money) -> Self {
        Self {
            category: category.into(),
            month: Some(month),
            amount,
        }
    }

    pub fn is_template(&self) -> bool {
        self.month.is_none()
    }

    /// Whether this budget applies to `month`
    pub fn applies_to(&self, month: MonthKey) -> bool {
        self.month.map_or(true, |m| m == month)
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.category.trim().is_empty() {
            return Err(BudgetValidationError::EmptyCategory);
        }
        if self.amount.is_negative() {
            return Err(BudgetValidationError::NegativeAmount(self.amount));
        }
        Ok(())
    }
}

/// Pick the budgets in effect for `month`: month-specific budgets win over
/// templates for the same category. Result is sorted by category name.
pub fn budgets_for_month(budgets: &[CategoryBudget], month: MonthKey) -> Vec<CategoryBudget> {
    let mut selected: std::collections::BTreeMap<String, CategoryBudget> =
        std::collections::BTreeMap::new();

    for budget in budgets.iter().filter(|b| b.is_template()) {
        selected.insert(budget.category.to_lowercase(), budget.clone());
    }
    for budget in budgets.iter().filter(|b| b.month == Some(month)) {
        selected.insert(budget.category.to_lowercase(), budget.clone());
    }

    selected.into_values().collect()
}

/// Validation errors for category budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    EmptyCategory,
    NegativeAmount(Money),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCategory => write!(f, "Budget category cannot be empty"),
            Self::NegativeAmount(amount) => {
                write!(f, "Budget amount cannot be negative: {}", amount)
            }
        }
    }
}

impl std::error::Error for BudgetValidationError {}
