//! Service layer for balance-cli
//!
//! The savings engine: monthly aggregation, goal allocation and the
//! projection that runs both over a transaction set, plus debt installments.
//! Everything here is pure and performs no I/O.

pub mod aggregator;
pub mod allocator;
pub mod debts;
pub mod projection;

pub use aggregator::{aggregate_monthly_balances, average_monthly_income};
pub use allocator::{
    allocate_savings, allocate_savings_with_ledger, distribute_round, AllocationOutcome,
    Contribution, MonthAllocation, RoundOutcome,
};
pub use debts::{apply_installments, DebtPayment, InstallmentOutcome};
pub use projection::{resolve_target, ProjectionOptions, SavingsProjection};
