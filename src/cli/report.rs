//! CLI commands for reports
//!
//! `summary`, `spending` and `budget`: load transactions, build a report,
//! then print it or export it to CSV.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::{BalancePaths, Settings};
use crate::error::{BalanceError, BalanceResult};
use crate::models::{MonthKey, Transaction};
use crate::reports::{BudgetStatusReport, MonthlySummaryReport, SpendingReport};
use crate::storage::{load_budgets, load_transactions};

/// Transactions input shared by every command that reads them
#[derive(Args, Debug, Clone, Default)]
pub struct TransactionsArg {
    /// Transactions file (.csv, .json, .yaml)
    #[arg(short, long, env = "BALANCE_TRANSACTIONS")]
    pub transactions: Option<PathBuf>,
}

impl TransactionsArg {
    pub fn load(&self, paths: &BalancePaths, settings: &Settings) -> BalanceResult<Vec<Transaction>> {
        let path = settings.transactions_path(self.transactions.as_deref(), paths);
        load_transactions(&path, &settings.date_format)
    }
}

/// Arguments for `balance summary`
#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub input: TransactionsArg,

    /// Export to CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `balance spending`
#[derive(Args, Debug)]
pub struct SpendingArgs {
    #[command(flatten)]
    pub input: TransactionsArg,

    /// First month to include (YYYY-MM)
    #[arg(long)]
    pub from: Option<String>,

    /// Last month to include (YYYY-MM)
    #[arg(long)]
    pub to: Option<String>,

    /// Show top N categories only
    #[arg(long)]
    pub top: Option<usize>,

    /// Export to CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `balance budget`
#[derive(Args, Debug)]
pub struct BudgetArgs {
    #[command(flatten)]
    pub input: TransactionsArg,

    /// Category budgets file (.json, .yaml)
    #[arg(short, long, env = "BALANCE_BUDGETS")]
    pub budgets: Option<PathBuf>,

    /// Month to report on (YYYY-MM), defaults to the current month
    #[arg(short, long)]
    pub month: Option<String>,

    /// Export to CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Handle `balance summary`
pub fn handle_summary_command(
    paths: &BalancePaths,
    settings: &Settings,
    args: SummaryArgs,
) -> BalanceResult<()> {
    let transactions = args.input.load(paths, settings)?;
    let report = MonthlySummaryReport::generate(&transactions);

    if let Some(path) = args.output {
        export_to_file(&path, |w| report.export_csv(w))?;
        println!("Monthly summary exported to: {}", path.display());
    } else {
        print!("{}", report.format_terminal(&settings.currency_symbol));
    }

    Ok(())
}

/// Handle `balance spending`
pub fn handle_spending_command(
    paths: &BalancePaths,
    settings: &Settings,
    args: SpendingArgs,
) -> BalanceResult<()> {
    let from = args.from.as_deref().map(parse_month_arg).transpose()?;
    let to = args.to.as_deref().map(parse_month_arg).transpose()?;

    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            return Err(BalanceError::Validation(format!(
                "--from {} is after --to {}",
                f, t
            )));
        }
    }

    let transactions = args.input.load(paths, settings)?;
    let mut report = SpendingReport::generate(&transactions, from, to);
    if let Some(n) = args.top {
        report.truncate(n);
    }

    if let Some(path) = args.output {
        export_to_file(&path, |w| report.export_csv(w))?;
        println!("Spending report exported to: {}", path.display());
    } else {
        print!("{}", report.format_terminal(&settings.currency_symbol));
    }

    Ok(())
}

/// Handle `balance budget`
pub fn handle_budget_command(
    paths: &BalancePaths,
    settings: &Settings,
    args: BudgetArgs,
) -> BalanceResult<()> {
    let month = match args.month.as_deref() {
        Some(m) => parse_month_arg(m)?,
        None => MonthKey::current(),
    };

    let transactions = args.input.load(paths, settings)?;
    let budgets_path = settings.budgets_path(args.budgets.as_deref(), paths);
    let budgets = load_budgets(&budgets_path)?;

    let report = BudgetStatusReport::generate(&transactions, &budgets, month);

    if let Some(path) = args.output {
        export_to_file(&path, |w| report.export_csv(w))?;
        println!("Budget status exported to: {}", path.display());
    } else {
        print!("{}", report.format_terminal(&settings.currency_symbol));
    }

    Ok(())
}

/// Parse a `YYYY-MM` command-line argument
pub(crate) fn parse_month_arg(s: &str) -> BalanceResult<MonthKey> {
    MonthKey::parse(s).map_err(|e| {
        BalanceError::Validation(format!(
            "Invalid month '{}': {}. Use YYYY-MM (e.g., 2025-01)",
            s, e
        ))
    })
}

/// Create `path` and hand a buffered writer to `export`
pub(crate) fn export_to_file<F>(path: &Path, export: F) -> BalanceResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> BalanceResult<()>,
{
    let file = File::create(path).map_err(|e| {
        BalanceError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    export(&mut writer)?;
    writer
        .flush()
        .map_err(|e| BalanceError::Export(format!("Failed to write {}: {}", path.display(), e)))
}
