//! Debt Report
//!
//! Outstanding balance and repayment progress of every debt, plus the
//! installments matched from transactions when there are any.

use std::io::Write;

use tabled::Tabled;

use crate::error::BalanceResult;
use crate::models::{Debt, DebtStatus, Money};
use crate::services::DebtPayment;

use super::{csv_writer, export_error, percent, render_table};

/// One debt's repayment progress
#[derive(Debug, Clone, PartialEq)]
pub struct DebtRow {
    pub debt_id: String,
    pub entity: String,
    pub initial_amount: Money,
    pub balance: Money,
    pub percent_paid: f64,
    pub remaining_installments: Option<u32>,
    pub status: DebtStatus,
}

impl DebtRow {
    fn new(debt: &Debt) -> Self {
        Self {
            debt_id: debt.id.clone(),
            entity: debt.entity.clone(),
            initial_amount: debt.initial_amount,
            balance: debt.balance,
            percent_paid: debt.percent_paid(),
            remaining_installments: debt.remaining_installments,
            status: debt.status,
        }
    }

    pub fn paid_amount(&self) -> Money {
        (self.initial_amount - self.balance).non_negative()
    }
}

#[derive(Tabled)]
struct DebtTableRow {
    #[tabled(rename = "Debt")]
    entity: String,
    #[tabled(rename = "Initial")]
    initial: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Installments Left")]
    installments: String,
    #[tabled(rename = "Status")]
    status: DebtStatus,
}

#[derive(Tabled)]
struct PaymentTableRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Debt")]
    debt_id: String,
    #[tabled(rename = "Expense")]
    amount: String,
    #[tabled(rename = "Applied")]
    applied: String,
}

/// Debt Report
#[derive(Debug, Clone)]
pub struct DebtReport {
    pub debts: Vec<DebtRow>,
    pub payments: Vec<DebtPayment>,
}

impl DebtReport {
    pub fn generate(debts: &[Debt], payments: &[DebtPayment]) -> Self {
        Self {
            debts: debts.iter().map(DebtRow::new).collect(),
            payments: payments.to_vec(),
        }
    }

    pub fn total_initial(&self) -> Money {
        self.debts.iter().map(|d| d.initial_amount).sum()
    }

    pub fn total_balance(&self) -> Money {
        self.debts.iter().map(|d| d.balance).sum()
    }

    pub fn total_applied(&self) -> Money {
        self.payments.iter().map(|p| p.applied).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let money = |m: Money| m.format_with_symbol(currency);
        let mut output = String::from("Debts\n");

        if self.debts.is_empty() {
            output.push_str("\nNo debts recorded.\n");
            return output;
        }

        let rows = self.debts.iter().map(|d| DebtTableRow {
            entity: d.entity.clone(),
            initial: money(d.initial_amount),
            balance: money(d.balance),
            paid: percent(d.percent_paid),
            installments: d
                .remaining_installments
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string()),
            status: d.status,
        });
        output.push_str(&render_table(rows));
        output.push('\n');
        output.push_str(&format!(
            "Outstanding: {} of {}\n",
            money(self.total_balance()),
            money(self.total_initial())
        ));

        if !self.payments.is_empty() {
            output.push_str("\nInstallments\n");
            let rows = self.payments.iter().map(|p| PaymentTableRow {
                date: p.date.to_string(),
                debt_id: p.debt_id.clone(),
                amount: money(p.amount),
                applied: money(p.applied),
            });
            output.push_str(&render_table(rows));
            output.push('\n');
            output.push_str(&format!("Applied: {}\n", money(self.total_applied())));
        }

        output
    }

    /// Export the debts to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BalanceResult<()> {
        let mut csv = csv_writer(writer);
        csv.write_record([
            "Debt ID",
            "Entity",
            "Initial",
            "Balance",
            "Paid",
            "Percent Paid",
            "Installments Left",
            "Status",
        ])
        .map_err(export_error)?;

        for d in &self.debts {
            csv.write_record([
                d.debt_id.clone(),
                d.entity.clone(),
                d.initial_amount.to_string(),
                d.balance.to_string(),
                d.paid_amount().to_string(),
                format!("{:.2}", d.percent_paid),
                d.remaining_installments.map(|n| n.to_string()).unwrap_or_default(),
                d.status.to_string(),
            ])
            .map_err(export_error)?;
        }

        csv.flush().map_err(export_error)?;
        Ok(())
    }
}
