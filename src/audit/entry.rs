//! Audit entry data structures
//!
//! One entry per goal or debt touched by a command: goals written by `init`
//! or raised by an allocation run, debts paid down by `amortize` or by
//! installments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Debt, RunId, SavingsGoal};

use super::diff::generate_diff;

/// What happened to the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Entity written for the first time
    Create,
    /// Goal's current amount raised by an allocation run
    Allocate,
    /// Debt balance lowered by a payment
    Amortize,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Allocate => write!(f, "ALLOCATE"),
            Operation::Amortize => write!(f, "AMORTIZE"),
        }
    }
}

/// Kinds of entities that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    #[default]
    Goal,
    Debt,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Goal => write!(f, "Goal"),
            EntityType::Debt => write!(f, "Debt"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Entries written by the same command share a run ID
    pub run_id: RunId,

    pub operation: Operation,

    #[serde(default)]
    pub entity_type: EntityType,

    pub entity_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable diff summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new<T: Serialize>(
        run_id: RunId,
        operation: Operation,
        entity_type: EntityType,
        entity_id: &str,
        entity_name: &str,
        before: Option<&T>,
        after: &T,
    ) -> Self {
        let before = before.and_then(|b| serde_json::to_value(b).ok());
        let after = serde_json::to_value(after).ok();
        let diff_summary = match (&before, &after) {
            (Some(b), Some(a)) => generate_diff(b, a),
            _ => None,
        };

        Self {
            timestamp: Utc::now(),
            run_id,
            operation,
            entity_type,
            entity_id: entity_id.to_string(),
            entity_name: Some(entity_name.to_string()),
            before,
            after,
            diff_summary,
        }
    }

    /// Entry for a newly written goal
    pub fn create(run_id: RunId, goal: &SavingsGoal) -> Self {
        Self::new(
            run_id,
            Operation::Create,
            EntityType::Goal,
            goal.id.as_str(),
            &goal.name,
            None,
            goal,
        )
    }

    /// Entry for a goal changed by an allocation run
    pub fn allocate(run_id: RunId, before: &SavingsGoal, after: &SavingsGoal) -> Self {
        Self::new(
            run_id,
            Operation::Allocate,
            EntityType::Goal,
            after.id.as_str(),
            &after.name,
            Some(before),
            after,
        )
    }

    /// Entry for a newly written debt
    pub fn create_debt(run_id: RunId, debt: &Debt) -> Self {
        Self::new(
            run_id,
            Operation::Create,
            EntityType::Debt,
            &debt.id,
            &debt.entity,
            None,
            debt,
        )
    }

    /// Entry for a debt paid down
    pub fn amortize(run_id: RunId, before: &Debt, after: &Debt) -> Self {
        Self::new(
            run_id,
            Operation::Amortize,
            EntityType::Debt,
            &after.id,
            &after.entity,
            Some(before),
            after,
        )
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.run_id,
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}
