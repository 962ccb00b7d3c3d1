//! Debt model
//!
//! A debt the household is paying down, such as the car loan. Payments
//! lower the outstanding balance, never below zero, and a debt whose balance
//! reaches zero is marked paid.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Repayment status of a debt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    #[default]
    #[serde(alias = "pendiente", alias = "Pendiente")]
    Pending,
    #[serde(alias = "pagado", alias = "Pagado")]
    Paid,
}

impl fmt::Display for DebtStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Paid => write!(f, "paid"),
        }
    }
}

/// A debt and its outstanding balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: String,

    /// Lender or the thing financed ("Carro"); expenses in a category with
    /// this name count as installments
    #[serde(alias = "entidad")]
    pub entity: String,

    #[serde(alias = "amount_initial", alias = "monto_inicial")]
    pub initial_amount: Money,

    #[serde(alias = "saldo")]
    pub balance: Money,

    #[serde(default, alias = "estado")]
    pub status: DebtStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, alias = "cuotas_restantes", skip_serializing_if = "Option::is_none")]
    pub remaining_installments: Option<u32>,
}

impl Debt {
    /// A new pending debt with nothing paid yet
    pub fn new(id: impl Into<String>, entity: impl Into<String>, amount: Money) -> Self {
        Self {
            id: id.into(),
            entity: entity.into(),
            initial_amount: amount,
            balance: amount,
            status: DebtStatus::Pending,
            start_date: None,
            remaining_installments: None,
        }
    }

    pub fn with_installments(mut self, installments: u32) -> Self {
        self.remaining_installments = Some(installments);
        self
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn is_paid(&self) -> bool {
        self.status == DebtStatus::Paid
    }

    /// Amount repaid so far
    pub fn paid_amount(&self) -> Money {
        (self.initial_amount - self.balance).non_negative()
    }

    /// Share of the initial amount repaid, 0-100
    pub fn percent_paid(&self) -> f64 {
        self.paid_amount().percent_of(self.initial_amount).min(100.0)
    }

    /// Pay down the balance by `amount` and return what was actually applied.
    ///
    /// Anything beyond the outstanding balance is ignored, and the debt is
    /// marked paid once the balance reaches zero. Installments are untouched.
    pub fn amortize(&mut self, amount: Money) -> Money {
        let applied = amount.non_negative().min(self.balance.non_negative());
        self.balance -= applied;
        if self.balance.is_zero() {
            self.status = DebtStatus::Paid;
        }
        applied
    }

    /// A regular installment: amortize and count one installment off
    pub fn pay_installment(&mut self, amount: Money) -> Money {
        let applied = self.amortize(amount);
        if let Some(left) = self.remaining_installments.as_mut() {
            *left = left.saturating_sub(1);
        }
        applied
    }

    pub fn validate(&self) -> Result<(), DebtValidationError> {
        if self.id.trim().is_empty() {
            return Err(DebtValidationError::EmptyId);
        }
        if self.entity.trim().is_empty() {
            return Err(DebtValidationError::EmptyEntity);
        }
        if self.initial_amount.is_negative() {
            return Err(DebtValidationError::NegativeAmount(self.initial_amount));
        }
        if self.balance.is_negative() {
            return Err(DebtValidationError::NegativeAmount(self.balance));
        }
        Ok(())
    }
}

impl fmt::Display for Debt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} of {} outstanding, {})",
            self.entity, self.balance, self.initial_amount, self.status
        )
    }
}

/// Validation errors for debts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebtValidationError {
    EmptyId,
    EmptyEntity,
    NegativeAmount(Money),
}

impl fmt::Display for DebtValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "Debt id cannot be empty"),
            Self::EmptyEntity => write!(f, "Debt entity cannot be empty"),
            Self::NegativeAmount(amount) => {
                write!(f, "Debt amounts cannot be negative: {}", amount)
            }
        }
    }
}

impl std::error::Error for DebtValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn car() -> Debt {
        Debt::new("car-debt-1", "Carro", Money::from_units(36128)).with_installments(33)
    }

    #[test]
    fn test_amortize_lowers_balance() {
        let mut debt = car();
        let applied = debt.amortize(Money::from_units(1128));

        assert_eq!(applied, Money::from_units(1128));
        assert_eq!(debt.balance, Money::from_units(35000));
        assert_eq!(debt.paid_amount(), Money::from_units(1128));
        assert_eq!(debt.status, DebtStatus::Pending);
        assert_eq!(debt.remaining_installments, Some(33));
    }

    #[test]
    fn test_amortize_past_zero_marks_paid() {
        let mut debt = Debt::new("d", "Banco", Money::from_units(500));
        let applied = debt.amortize(Money::from_units(800));

        assert_eq!(applied, Money::from_units(500));
        assert_eq!(debt.balance, Money::zero());
        assert!(debt.is_paid());
        assert_eq!(debt.percent_paid(), 100.0);

        assert_eq!(debt.amortize(Money::from_units(10)), Money::zero());
        assert_eq!(debt.balance, Money::zero());
    }

    #[test]
    fn test_negative_payment_is_ignored() {
        let mut debt = car();
        assert_eq!(debt.amortize(Money::from_units(-50)), Money::zero());
        assert_eq!(debt.balance, Money::from_units(36128));
    }

    #[test]
    fn test_installment_counts_down_without_underflow() {
        let mut debt = Debt::new("d", "Carro", Money::from_units(300)).with_installments(1);
        debt.pay_installment(Money::from_units(100));
        debt.pay_installment(Money::from_units(100));

        assert_eq!(debt.remaining_installments, Some(0));
        assert_eq!(debt.balance, Money::from_units(100));
    }

    #[test]
    fn test_deserialize_spanish_fields() {
        let yaml = r#"
id: car-debt-1
entity: Carro
amount_initial: 36128
saldo: 30000
estado: Pendiente
cuotas_restantes: 28
"#;
        let debt: Debt = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(debt.initial_amount, Money::from_units(36128));
        assert_eq!(debt.balance, Money::from_units(30000));
        assert_eq!(debt.status, DebtStatus::Pending);
        assert_eq!(debt.remaining_installments, Some(28));
        assert!((debt.percent_paid() - 16.96).abs() < 0.01);
    }

    #[test]
    fn test_validate() {
        assert!(car().validate().is_ok());

        let mut bad = car();
        bad.balance = Money::from_units(-1);
        assert_eq!(
            bad.validate(),
            Err(DebtValidationError::NegativeAmount(Money::from_units(-1)))
        );
        assert_eq!(
            Debt::new(" ", "Carro", Money::zero()).validate(),
            Err(DebtValidationError::EmptyId)
        );
    }
}
