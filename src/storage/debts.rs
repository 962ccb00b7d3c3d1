//! Debts file
//!
//! A JSON or YAML list of debts, validated on load and written back
//! atomically after a payment.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{BalanceError, BalanceResult};
use crate::models::{Debt, Money};

use super::file_io::{read_document, write_document_atomic};

/// Load debts, rejecting invalid records and duplicate ids
pub fn load_debts(path: &Path) -> BalanceResult<Vec<Debt>> {
    let debts: Vec<Debt> = read_document(path)?;

    let mut seen = HashSet::new();
    for (idx, debt) in debts.iter().enumerate() {
        debt.validate()
            .map_err(|e| BalanceError::Validation(format!("debt {}: {}", idx + 1, e)))?;
        if !seen.insert(debt.id.as_str()) {
            return Err(BalanceError::duplicate_debt(debt.id.as_str()));
        }
    }

    tracing::info!(path = %path.display(), count = debts.len(), "loaded debts");
    Ok(debts)
}

pub fn save_debts(path: &Path, debts: &[Debt]) -> BalanceResult<()> {
    write_document_atomic(path, &debts)
}

/// The household's car loan: 36128 over 33 monthly installments
pub fn sample_debts() -> Vec<Debt> {
    vec![Debt::new("car-debt-1", "Carro", Money::from_units(36128)).with_installments(33)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_debts() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("debts.yaml");

        save_debts(&path, &sample_debts()).unwrap();
        assert_eq!(load_debts(&path).unwrap(), sample_debts());
    }

    #[test]
    fn test_duplicate_debt_ids_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("debts.json");
        fs::write(
            &path,
            r#"[{"id":"d","entity":"Carro","initial_amount":10,"balance":10},
                {"id":"d","entity":"Banco","initial_amount":20,"balance":20}]"#,
        )
        .unwrap();

        let err = load_debts(&path).unwrap_err();
        assert!(matches!(err, BalanceError::Duplicate { .. }));
    }

    #[test]
    fn test_negative_balance_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("debts.yaml");
        fs::write(
            &path,
            "- id: d\n  entity: Carro\n  initial_amount: 100\n  balance: -5\n",
        )
        .unwrap();

        let err = load_debts(&path).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("debt 1"));
    }
}
