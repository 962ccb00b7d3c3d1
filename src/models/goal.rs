//! Savings goal model
//!
//! A goal has a target, a running current amount and a priority tier. Tier 1
//! goals (the emergency fund) are funded first each month up to a monthly
//! contribution cap; tier 2 goals share whatever is left.
//!
//! A goal never holds more than its target, so a goal with a zero (or
//! missing) target has no room and is complete from the start. Negative
//! targets, caps and current amounts are clamped to zero when a goal is built
//! or deserialized.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::ids::GoalId;
use super::money::Money;

/// Funding priority of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PriorityTier {
    /// Funded first, limited by the goal's monthly contribution cap
    First,
    /// Funded equitably from the balance left after tier 1
    Second,
}

impl TryFrom<u8> for PriorityTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            other => Err(format!("priority tier must be 1 or 2, got {}", other)),
        }
    }
}

impl From<PriorityTier> for u8 {
    fn from(tier: PriorityTier) -> Self {
        match tier {
            PriorityTier::First => 1,
            PriorityTier::Second => 2,
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Whether a goal can still receive contributions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalState {
    Funding,
    Complete,
}

impl fmt::Display for GoalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Funding => write!(f, "funding"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// A savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: GoalId,

    pub name: String,

    /// Zero leaves the goal without room
    #[serde(default, alias = "goal", deserialize_with = "non_negative")]
    pub target_amount: Money,

    #[serde(default, alias = "current", deserialize_with = "non_negative")]
    pub current_amount: Money,

    #[serde(alias = "priority", alias = "tier")]
    pub priority_tier: PriorityTier,

    /// Only consulted for tier 1 goals
    #[serde(
        default,
        alias = "contribution_cap",
        deserialize_with = "non_negative_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub monthly_contribution_cap: Option<Money>,

    /// Free-form label ("Emergencia", "Viaje", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Derive the target as this many months of average income
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_months_of_income: Option<u32>,
}

fn non_negative<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
    Ok(Money::deserialize(deserializer)?.non_negative())
}

fn non_negative_opt<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Money>, D::Error> {
    Ok(Option::<Money>::deserialize(deserializer)?.map(|m| m.non_negative()))
}

impl SavingsGoal {
    /// Create a goal with nothing saved yet
    pub fn new(
        id: impl Into<GoalId>,
        name: impl Into<String>,
        target_amount: Money,
        priority_tier: PriorityTier,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            target_amount: target_amount.non_negative(),
            current_amount: Money::zero(),
            priority_tier,
            monthly_contribution_cap: None,
            kind: None,
            target_months_of_income: None,
        }
    }

    /// A tier 1 goal funded by at most `monthly_cap` per month
    pub fn priority(
        id: impl Into<GoalId>,
        name: impl Into<String>,
        target_amount: Money,
        monthly_cap: Money,
    ) -> Self {
        Self::new(id, name, target_amount, PriorityTier::First).with_monthly_cap(monthly_cap)
    }

    /// A tier 2 goal
    pub fn equitable(id: impl Into<GoalId>, name: impl Into<String>, target_amount: Money) -> Self {
        Self::new(id, name, target_amount, PriorityTier::Second)
    }

    pub fn with_current(mut self, current: Money) -> Self {
        self.current_amount = current.non_negative();
        self
    }

    pub fn with_monthly_cap(mut self, cap: Money) -> Self {
        self.monthly_contribution_cap = Some(cap.non_negative());
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn with_income_multiple(mut self, months: u32) -> Self {
        self.target_months_of_income = Some(months);
        self
    }

    /// Room left before the target
    pub fn remaining(&self) -> Money {
        (self.target_amount - self.current_amount).non_negative()
    }

    pub fn state(&self) -> GoalState {
        if self.current_amount >= self.target_amount {
            GoalState::Complete
        } else {
            GoalState::Funding
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == GoalState::Complete
    }

    pub fn is_tier_one(&self) -> bool {
        self.priority_tier == PriorityTier::First
    }

    pub fn is_tier_two(&self) -> bool {
        self.priority_tier == PriorityTier::Second
    }

    /// Share of the target reached, 0-100 (100 for a zero target)
    pub fn percent_complete(&self) -> f64 {
        if self.target_amount.is_zero() {
            100.0
        } else {
            self.current_amount.percent_of(self.target_amount).min(100.0)
        }
    }

    /// Largest contribution this goal accepts out of `offered`
    pub fn accept(&self, offered: Money) -> Money {
        offered.non_negative().min(self.remaining())
    }

    /// Add a contribution. Negative amounts are ignored so the current amount
    /// never decreases.
    pub(crate) fn contribute(&mut self, amount: Money) {
        if amount.is_positive() {
            self.current_amount += amount;
        }
    }
}

impl fmt::Display for SavingsGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} / {})", self.name, self.current_amount, self.target_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_and_state() {
        let goal = SavingsGoal::equitable("sav_travel", "Travel", Money::from_units(3000))
            .with_current(Money::from_units(2900));
        assert_eq!(goal.remaining(), Money::from_units(100));
        assert_eq!(goal.state(), GoalState::Funding);

        let done = goal.clone().with_current(Money::from_units(3000));
        assert!(done.is_complete());
        assert_eq!(done.percent_complete(), 100.0);
    }

    #[test]
    fn test_zero_target_is_complete() {
        let goal = SavingsGoal::equitable("open", "Open", Money::zero());
        assert_eq!(goal.remaining(), Money::zero());
        assert!(goal.is_complete());
        assert_eq!(goal.accept(Money::from_units(999)), Money::zero());
        assert_eq!(goal.percent_complete(), 100.0);
    }

    #[test]
    fn test_over_target_goal_accepts_nothing() {
        let goal = SavingsGoal::equitable("g", "Gift", Money::from_units(100))
            .with_current(Money::from_units(150));
        assert!(goal.is_complete());
        assert_eq!(goal.remaining(), Money::zero());
        assert_eq!(goal.accept(Money::from_units(10)), Money::zero());
    }

    #[test]
    fn test_negative_inputs_clamp_to_zero() {
        let goal = SavingsGoal::priority("e", "Emergency", Money::from_units(-5), Money::from_units(-1))
            .with_current(Money::from_units(-20));
        assert_eq!(goal.target_amount, Money::zero());
        assert_eq!(goal.monthly_contribution_cap, Some(Money::zero()));
        assert_eq!(goal.current_amount, Money::zero());
    }

    #[test]
    fn test_accept_limits_to_room() {
        let goal = SavingsGoal::equitable("g", "Gift", Money::from_units(1000))
            .with_current(Money::from_units(400));
        assert_eq!(goal.accept(Money::from_units(900)), Money::from_units(600));
        assert_eq!(goal.accept(Money::from_units(-5)), Money::zero());
    }

    #[test]
    fn test_contribute_never_decreases() {
        let mut goal = SavingsGoal::equitable("g", "Gift", Money::from_units(1000));
        goal.contribute(Money::from_units(100));
        goal.contribute(Money::from_units(-50));
        assert_eq!(goal.current_amount, Money::from_units(100));
    }

    #[test]
    fn test_deserialize_with_aliases_and_clamping() {
        let yaml = r#"
id: sav_emergency
name: Fondo de Emergencia
goal: -10
current: 250.5
priority: 1
contribution_cap: 2000
kind: Emergencia
target_months_of_income: 6
"#;
        let goal: SavingsGoal = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(goal.priority_tier, PriorityTier::First);
        assert_eq!(goal.target_amount, Money::zero());
        assert_eq!(goal.current_amount.cents(), 25050);
        assert_eq!(goal.monthly_contribution_cap, Some(Money::from_units(2000)));
        assert_eq!(goal.target_months_of_income, Some(6));
    }

    #[test]
    fn test_invalid_tier_rejected() {
        let json = r#"{"id":"x","name":"X","priority_tier":3}"#;
        assert!(serde_json::from_str::<SavingsGoal>(json).is_err());
    }
}
