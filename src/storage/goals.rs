//! Savings goal and budget configuration files
//!
//! Goals and category budgets are JSON or YAML lists. Goals are validated on
//! load (unique IDs) and written back atomically after an allocation is
//! applied.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{BalanceError, BalanceResult};
use crate::models::{CategoryBudget, Money, SavingsGoal};

use super::file_io::{read_document, write_document_atomic};

/// Load the goal configuration
pub fn load_goals(path: &Path) -> BalanceResult<Vec<SavingsGoal>> {
    let goals: Vec<SavingsGoal> = read_document(path)?;
    validate_goals(&goals)?;

    tracing::info!(path = %path.display(), count = goals.len(), "loaded savings goals");
    Ok(goals)
}

/// Write goals back, replacing the file atomically
pub fn save_goals(path: &Path, goals: &[SavingsGoal]) -> BalanceResult<()> {
    write_document_atomic(path, &goals)
}

/// Reject duplicate goal IDs
pub fn validate_goals(goals: &[SavingsGoal]) -> BalanceResult<()> {
    let mut seen = HashSet::new();
    for goal in goals {
        if goal.id.as_str().trim().is_empty() {
            return Err(BalanceError::Validation(format!(
                "Savings goal '{}' has an empty id",
                goal.name
            )));
        }
        if !seen.insert(goal.id.as_str()) {
            return Err(BalanceError::duplicate_goal(goal.id.as_str()));
        }
    }
    Ok(())
}

/// Load category budgets
pub fn load_budgets(path: &Path) -> BalanceResult<Vec<CategoryBudget>> {
    let budgets: Vec<CategoryBudget> = read_document(path)?;
    for (idx, budget) in budgets.iter().enumerate() {
        budget.validate().map_err(|e| {
            BalanceError::Validation(format!("budget {}: {}", idx + 1, e))
        })?;
    }

    tracing::info!(path = %path.display(), count = budgets.len(), "loaded category budgets");
    Ok(budgets)
}

/// The household's default goals: an emergency fund worth six months of
/// income, funded first at 2000 a month, and three shared goals.
pub fn sample_goals() -> Vec<SavingsGoal> {
    vec![
        SavingsGoal::priority(
            "sav_emergency",
            "Fondo de Emergencia",
            Money::zero(),
            Money::from_units(2000),
        )
        .with_income_multiple(6)
        .with_kind("Emergencia"),
        SavingsGoal::equitable("sav_london", "Viaje Londres", Money::from_units(30000))
            .with_kind("Viaje"),
        SavingsGoal::equitable("sav_ana", "Cumple Ana", Money::from_units(15000))
            .with_kind("Hogar"),
        SavingsGoal::equitable("sav_car", "Amortización carro", Money::from_units(5000))
            .with_kind("Deuda"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_goals() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("goals.yaml");

        save_goals(&path, &sample_goals()).unwrap();
        let loaded = load_goals(&path).unwrap();

        assert_eq!(loaded, sample_goals());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("goals.json");
        fs::write(
            &path,
            r#"[{"id":"a","name":"A","priority_tier":2,"target_amount":10},
                {"id":"a","name":"B","priority_tier":2,"target_amount":20}]"#,
        )
        .unwrap();

        let err = load_goals(&path).unwrap_err();
        assert!(matches!(err, BalanceError::Duplicate { .. }));
    }

    #[test]
    fn test_load_budgets() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.yaml");
        fs::write(
            &path,
            "- category: Mercado\n  amount: 800\n- category: Salidas\n  month: 2025-01\n  amount: 250.5\n",
        )
        .unwrap();

        let budgets = load_budgets(&path).unwrap();
        assert_eq!(budgets.len(), 2);
        assert!(budgets[0].is_template());
        assert_eq!(budgets[1].month.unwrap().to_string(), "2025-01");
    }

    #[test]
    fn test_negative_budget_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");
        fs::write(&path, r#"[{"category":"Food","amount":-5}]"#).unwrap();

        let err = load_budgets(&path).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("budget 1"));
    }
}
