//! `balance init` and `balance config`

use clap::Args;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::{BalancePaths, Settings};
use crate::error::BalanceResult;
use crate::models::{RunId, SavingsGoal};
use crate::storage::{sample_debts, sample_goals, save_debts, save_goals};

/// Arguments for `balance init`
#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Overwrite existing goals and debts files with the samples
    #[arg(long)]
    pub force: bool,
}

/// Handle `balance init`: write settings plus sample goals and debts files
pub fn handle_init_command(
    paths: &BalancePaths,
    settings: &Settings,
    args: InitArgs,
) -> BalanceResult<()> {
    println!("Initializing balance-cli at: {}", paths.base_dir().display());
    settings.save(paths)?;

    let run_id = RunId::new();
    let mut entries = Vec::new();

    let goals_path = settings.goals_path(None, paths);
    if goals_path.exists() && !args.force {
        println!(
            "Goals file already exists, leaving it alone: {}",
            goals_path.display()
        );
    } else {
        let goals = household_goals(settings);
        save_goals(&goals_path, &goals)?;
        entries.extend(goals.iter().map(|goal| AuditEntry::create(run_id, goal)));

        println!("Sample goals written to: {}", goals_path.display());
        for goal in &goals {
            println!("  - {}", goal);
        }
    }

    let debts_path = settings.debts_path(None, paths);
    if debts_path.exists() && !args.force {
        println!(
            "Debts file already exists, leaving it alone: {}",
            debts_path.display()
        );
    } else {
        let debts = sample_debts();
        save_debts(&debts_path, &debts)?;
        entries.extend(debts.iter().map(|debt| AuditEntry::create_debt(run_id, debt)));

        println!("Sample debts written to: {}", debts_path.display());
        for debt in &debts {
            println!("  - {}", debt);
        }
    }

    AuditLogger::new(paths.audit_log()).log_batch(&entries)?;

    println!();
    println!("Run 'balance savings --transactions <FILE>' to allocate your balances.");

    Ok(())
}

/// Sample goals with the emergency fund sized by the configured multiplier
fn household_goals(settings: &Settings) -> Vec<SavingsGoal> {
    sample_goals()
        .into_iter()
        .map(|goal| match goal.target_months_of_income {
            Some(_) => goal.with_income_multiple(settings.emergency_months),
            None => goal,
        })
        .collect()
}

/// Handle `balance config`: show paths and settings
pub fn handle_config_command(paths: &BalancePaths, settings: &Settings) -> BalanceResult<()> {
    println!("balance-cli Configuration");
    println!("=========================");
    println!("Base directory:    {}", paths.base_dir().display());
    println!("Settings file:     {}", paths.settings_file().display());
    println!("Audit log:         {}", paths.audit_log().display());
    println!("Initialized:       {}", paths.is_initialized());
    println!();
    println!("Data files:");
    println!("  Transactions:    {}", settings.transactions_path(None, paths).display());
    println!("  Goals:           {}", settings.goals_path(None, paths).display());
    println!("  Budgets:         {}", settings.budgets_path(None, paths).display());
    println!("  Debts:           {}", settings.debts_path(None, paths).display());
    println!();
    println!("Settings:");
    println!("  Currency symbol: {}", settings.currency_symbol);
    println!("  Date format:     {}", settings.date_format);
    println!("  Emergency fund:  {} months of income", settings.emergency_months);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::audit::EntityType;
    use crate::storage::{load_debts, load_goals};
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_settings_goals_and_audit() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BalancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings {
            emergency_months: 3,
            ..Settings::default()
        };

        handle_init_command(&paths, &settings, InitArgs::default()).unwrap();

        assert!(paths.is_initialized());
        let goals = load_goals(&paths.goals_file()).unwrap();
        assert_eq!(goals.len(), 4);
        assert_eq!(goals[0].target_months_of_income, Some(3));

        assert_eq!(load_debts(&paths.debts_file()).unwrap().len(), 1);

        let entries = AuditLogger::new(paths.audit_log()).read_all().unwrap();
        assert_eq!(entries.len(), 5);
        assert!(entries.iter().all(|e| e.operation == Operation::Create));
        assert_eq!(entries[4].entity_type, EntityType::Debt);
    }

    #[test]
    fn test_init_keeps_existing_goals() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BalancePaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings::default();

        let mine = vec![SavingsGoal::equitable("mine", "Mine", crate::models::Money::from_units(10))];
        save_goals(&paths.goals_file(), &mine).unwrap();

        handle_init_command(&paths, &settings, InitArgs::default()).unwrap();
        assert_eq!(load_goals(&paths.goals_file()).unwrap(), mine);
        assert!(paths.debts_file().exists());

        handle_init_command(&paths, &settings, InitArgs { force: true }).unwrap();
        assert_eq!(load_goals(&paths.goals_file()).unwrap().len(), 4);
    }
}
