use anyhow::Result;
use clap::{Parser, Subcommand};

use balance::cli::{
    handle_amortize_command, handle_budget_command, handle_config_command, handle_debts_command,
    handle_init_command, handle_savings_command, handle_spending_command, handle_summary_command,
    AmortizeArgs, BudgetArgs, DebtsArgs, InitArgs, SavingsArgs, SpendingArgs, SummaryArgs,
};
use balance::config::{BalancePaths, Settings};

#[derive(Parser)]
#[command(
    name = "balance",
    version,
    about = "Shared household finance tracker with savings-goal allocation",
    long_about = "balance reads a household's income and expense history, reports \
                  monthly balances, spending and budget status, and distributes each \
                  month's surplus across prioritized savings goals. It also tracks \
                  debts and their repayment."
)]
struct Cli {
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Log debug output (overridden by BALANCE_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Income, expense, net and savings rate per month
    Summary(SummaryArgs),

    /// Spending by category
    Spending(SpendingArgs),

    /// Budget against actual spending for one month
    Budget(BudgetArgs),

    /// Allocate monthly balances to savings goals
    Savings(SavingsArgs),

    /// Debt balances and repayment progress
    Debts(DebtsArgs),

    /// Record an extra payment on a debt
    Amortize(AmortizeArgs),

    /// Write default settings and sample goals and debts files
    Init(InitArgs),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let paths = BalancePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Summary(args)) => handle_summary_command(&paths, &settings, args)?,
        Some(Commands::Spending(args)) => handle_spending_command(&paths, &settings, args)?,
        Some(Commands::Budget(args)) => handle_budget_command(&paths, &settings, args)?,
        Some(Commands::Savings(args)) => handle_savings_command(&paths, &settings, args)?,
        Some(Commands::Debts(args)) => handle_debts_command(&paths, &settings, args)?,
        Some(Commands::Amortize(args)) => handle_amortize_command(&paths, &settings, args)?,
        Some(Commands::Init(args)) => handle_init_command(&paths, &settings, args)?,
        Some(Commands::Config) => handle_config_command(&paths, &settings)?,
        None => {
            println!("balance - shared household finances and savings goals");
            println!();
            println!("Run 'balance --help' for usage information.");
            println!("Run 'balance init' to create settings, sample goals and debts.");
        }
    }

    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("BALANCE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
