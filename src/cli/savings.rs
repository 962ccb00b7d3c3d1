//! CLI command for the savings projection
//!
//! Runs the allocator over the transaction history and shows where each
//! month's balance went. With `--apply` the new current amounts are written
//! back to the goals file and every changed goal is recorded in the audit log.

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Args;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::{BalancePaths, Settings};
use crate::error::BalanceResult;
use crate::models::{GoalId, RunId, SavingsGoal};
use crate::reports::SavingsReport;
use crate::services::{ProjectionOptions, SavingsProjection};
use crate::storage::{load_goals, save_goals};

use super::report::{export_to_file, TransactionsArg};

/// Arguments for `balance savings`
#[derive(Args, Debug)]
pub struct SavingsArgs {
    #[command(flatten)]
    pub input: TransactionsArg,

    /// Savings goals file (.json, .yaml)
    #[arg(short, long, env = "BALANCE_GOALS")]
    pub goals: Option<PathBuf>,

    /// Project every goal from zero, ignoring recorded current amounts
    #[arg(long)]
    pub from_zero: bool,

    /// Write the new current amounts back to the goals file
    #[arg(long, conflicts_with = "from_zero")]
    pub apply: bool,

    /// Show the month-by-month allocation (with --output, export it instead)
    #[arg(short, long)]
    pub ledger: bool,

    /// Export to CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle `balance savings`
pub fn handle_savings_command(
    paths: &BalancePaths,
    settings: &Settings,
    args: SavingsArgs,
) -> BalanceResult<()> {
    let transactions = args.input.load(paths, settings)?;
    let goals_path = settings.goals_path(args.goals.as_deref(), paths);
    let goals = load_goals(&goals_path)?;

    let projection = SavingsProjection::generate(
        &transactions,
        &goals,
        ProjectionOptions {
            from_zero: args.from_zero,
        },
    );
    let report = SavingsReport::generate(&projection);

    if let Some(path) = &args.output {
        if args.ledger {
            export_to_file(path, |w| report.export_ledger_csv(w))?;
            println!("Savings ledger exported to: {}", path.display());
        } else {
            export_to_file(path, |w| report.export_csv(w))?;
            println!("Savings report exported to: {}", path.display());
        }
    } else {
        print!("{}", report.format_terminal(&settings.currency_symbol, args.ledger));
    }

    if args.apply {
        let updated = merge_current_amounts(&goals, &projection.goals);
        let changed: HashSet<&GoalId> = projection
            .changed_goals()
            .map(|(_, after)| &after.id)
            .collect();
        let run_id = RunId::new();

        let entries: Vec<AuditEntry> = goals
            .iter()
            .zip(&updated)
            .filter(|(before, _)| changed.contains(&before.id))
            .map(|(before, after)| AuditEntry::allocate(run_id, before, after))
            .collect();

        if entries.is_empty() {
            println!("No goal changed; {} left untouched.", goals_path.display());
            return Ok(());
        }

        save_goals(&goals_path, &updated)?;
        AuditLogger::new(paths.audit_log()).log_batch(&entries)?;

        tracing::info!(
            run = %run_id,
            goals = entries.len(),
            path = %goals_path.display(),
            "applied savings allocation"
        );
        println!(
            "Applied allocation to {} goal(s) in {} ({})",
            entries.len(),
            goals_path.display(),
            run_id
        );
    }

    Ok(())
}

/// Take the allocated current amounts while keeping each goal's configured
/// target, so income-based targets stay income-based on disk.
fn merge_current_amounts(configured: &[SavingsGoal], allocated: &[SavingsGoal]) -> Vec<SavingsGoal> {
    configured
        .iter()
        .zip(allocated)
        .map(|(goal, after)| SavingsGoal {
            current_amount: after.current_amount,
            ..goal.clone()
        })
        .collect()
}
