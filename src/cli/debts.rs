//! CLI commands for debts
//!
//! `debts` shows repayment progress and, with `--installments`, matches
//! expenses against each debt's entity. `amortize` records an extra payment
//! on one debt.

use std::path::PathBuf;

use clap::Args;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::{BalancePaths, Settings};
use crate::error::{BalanceError, BalanceResult};
use crate::models::{Money, RunId};
use crate::reports::DebtReport;
use crate::services::apply_installments;
use crate::storage::{load_debts, save_debts};

use super::report::{export_to_file, TransactionsArg};

/// Arguments for `balance debts`
#[derive(Args, Debug)]
pub struct DebtsArgs {
    /// Debts file (.json, .yaml)
    #[arg(short, long, env = "BALANCE_DEBTS")]
    pub debts: Option<PathBuf>,

    /// Pay installments from expenses whose category matches a debt
    #[arg(long)]
    pub installments: bool,

    #[command(flatten)]
    pub input: TransactionsArg,

    /// Write the paid-down balances back to the debts file
    #[arg(long, requires = "installments")]
    pub apply: bool,

    /// Export to CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `balance amortize`
#[derive(Args, Debug)]
pub struct AmortizeArgs {
    /// Debt to pay down
    pub debt_id: String,

    /// Payment amount (e.g., 1500 or 1,500.50)
    pub amount: String,

    /// Debts file (.json, .yaml)
    #[arg(short, long, env = "BALANCE_DEBTS")]
    pub debts: Option<PathBuf>,
}

/// Handle `balance debts`
pub fn handle_debts_command(
    paths: &BalancePaths,
    settings: &Settings,
    args: DebtsArgs,
) -> BalanceResult<()> {
    let debts_path = settings.debts_path(args.debts.as_deref(), paths);
    let debts = load_debts(&debts_path)?;

    let (updated, payments) = if args.installments {
        let transactions = args.input.load(paths, settings)?;
        let outcome = apply_installments(&debts, &transactions);
        (outcome.debts, outcome.payments)
    } else {
        (debts.clone(), Vec::new())
    };

    let report = DebtReport::generate(&updated, &payments);
    if let Some(path) = &args.output {
        export_to_file(path, |w| report.export_csv(w))?;
        println!("Debt report exported to: {}", path.display());
    } else {
        print!("{}", report.format_terminal(&settings.currency_symbol));
    }

    if args.apply {
        let run_id = RunId::new();
        let entries: Vec<AuditEntry> = debts
            .iter()
            .zip(&updated)
            .filter(|(before, after)| before != after)
            .map(|(before, after)| AuditEntry::amortize(run_id, before, after))
            .collect();

        if entries.is_empty() {
            println!("No debt changed; {} left untouched.", debts_path.display());
            return Ok(());
        }

        save_debts(&debts_path, &updated)?;
        AuditLogger::new(paths.audit_log()).log_batch(&entries)?;

        tracing::info!(
            run = %run_id,
            debts = entries.len(),
            path = %debts_path.display(),
            "applied debt installments"
        );
        println!(
            "Applied installments to {} debt(s) in {} ({})",
            entries.len(),
            debts_path.display(),
            run_id
        );
    }

    Ok(())
}

/// Handle `balance amortize`
pub fn handle_amortize_command(
    paths: &BalancePaths,
    settings: &Settings,
    args: AmortizeArgs,
) -> BalanceResult<()> {
    let amount = parse_payment(&args.amount)?;

    let debts_path = settings.debts_path(args.debts.as_deref(), paths);
    let mut debts = load_debts(&debts_path)?;

    let debt = debts
        .iter_mut()
        .find(|d| d.id == args.debt_id)
        .ok_or_else(|| BalanceError::debt_not_found(&args.debt_id))?;

    if debt.is_paid() {
        return Err(BalanceError::Validation(format!(
            "Debt '{}' is already paid",
            debt.id
        )));
    }

    let before = debt.clone();
    let applied = debt.amortize(amount);
    let entry = AuditEntry::amortize(RunId::new(), &before, debt);
    let currency = settings.currency_symbol.as_str();

    println!(
        "Paid {} on {}; balance now {}",
        applied.format_with_symbol(currency),
        debt.entity,
        debt.balance.format_with_symbol(currency)
    );
    if applied < amount {
        println!(
            "Only {} was owed; {} not applied.",
            applied.format_with_symbol(currency),
            (amount - applied).format_with_symbol(currency)
        );
    }
    if debt.is_paid() {
        println!("{} is fully paid.", debt.entity);
    }

    save_debts(&debts_path, &debts)?;
    AuditLogger::new(paths.audit_log()).log(&entry)?;

    Ok(())
}

fn parse_payment(s: &str) -> BalanceResult<Money> {
    let amount = Money::parse(s)
        .map_err(|e| BalanceError::Validation(format!("{}. Use a number like 1500.00", e)))?;
    if !amount.is_positive() {
        return Err(BalanceError::Validation(format!(
            "Payment must be positive, got {}",
            amount
        )));
    }
    Ok(amount)
}
