//! Transaction loading
//!
//! Reads transaction batches from JSON, YAML or CSV. Loading is strict: a
//! single record with an unparsable date, unknown type, or a malformed,
//! oversized or negative amount rejects the whole batch, and the error names
//! the offending record.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;

use crate::error::{BalanceError, BalanceResult};
use crate::models::money::RawAmount;
use crate::models::{Transaction, TransactionType};

use super::file_io::{read_document, DataFormat};

/// Fallback date formats tried after the configured one
const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y", "%m/%d/%Y", "%d/%m/%y",
];

/// A transaction as written in a file, before validation
#[derive(Debug, Clone, Deserialize)]
struct RawTransaction {
    #[serde(alias = "occurred_on", alias = "fecha")]
    date: String,
    #[serde(rename = "type", alias = "tipo", alias = "kind")]
    kind: String,
    #[serde(alias = "monto")]
    amount: RawAmount,
    #[serde(default, alias = "categoria")]
    category: Option<String>,
    #[serde(default, alias = "persona")]
    person: Option<String>,
    #[serde(default, alias = "nota")]
    note: Option<String>,
}

impl RawTransaction {
    fn into_transaction(self, location: &str, date_format: &str) -> BalanceResult<Transaction> {
        let date = parse_date(&self.date, date_format).ok_or_else(|| {
            BalanceError::Validation(format!("{}: invalid date '{}'", location, self.date))
        })?;

        let kind = TransactionType::parse(&self.kind).ok_or_else(|| {
            BalanceError::Validation(format!(
                "{}: unknown transaction type '{}' (expected income or expense)",
                location, self.kind
            ))
        })?;

        let amount = self.amount.to_money().map_err(|_| {
            BalanceError::Validation(format!("{}: invalid amount '{}'", location, self.amount))
        })?;

        let mut txn = Transaction::new(
            date,
            kind,
            amount,
            self.category.unwrap_or_default().trim(),
        );
        txn.person = self.person.filter(|p| !p.trim().is_empty());
        txn.note = self.note.filter(|n| !n.trim().is_empty());

        txn.validate()
            .map_err(|e| BalanceError::Validation(format!("{}: {}", location, e)))?;

        Ok(txn)
    }
}

/// Parse a date using the configured format first, then common alternatives
pub fn parse_date(s: &str, primary_format: &str) -> Option<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, primary_format) {
        return Some(date);
    }

    // Timestamps such as "2025-01-05T10:00:00Z" keep their date part
    if let Some(day) = s.get(..10) {
        if s.len() > 10 && s[10..].starts_with('T') {
            if let Ok(date) = NaiveDate::parse_from_str(day, "%Y-%m-%d") {
                return Some(date);
            }
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
}

/// Load a batch of transactions, picking the format from the extension
pub fn load_transactions(path: &Path, date_format: &str) -> BalanceResult<Vec<Transaction>> {
    let transactions = match DataFormat::from_path(path)? {
        DataFormat::Csv => {
            let file = std::fs::File::open(path).map_err(|e| {
                BalanceError::Storage(format!("Failed to open {}: {}", path.display(), e))
            })?;
            parse_transactions_csv(file, date_format)?
        }
        DataFormat::Json | DataFormat::Yaml => {
            let raw: Vec<RawTransaction> = read_document(path)?;
            raw.into_iter()
                .enumerate()
                .map(|(idx, r)| r.into_transaction(&format!("record {}", idx + 1), date_format))
                .collect::<BalanceResult<Vec<_>>>()?
        }
    };

    tracing::info!(
        path = %path.display(),
        count = transactions.len(),
        "loaded transactions"
    );

    Ok(transactions)
}

/// Column positions found in a CSV header
#[derive(Debug, Clone, Default)]
struct CsvColumns {
    date: usize,
    kind: usize,
    amount: usize,
    category: Option<usize>,
    person: Option<usize>,
    note: Option<usize>,
}

impl CsvColumns {
    fn from_headers(headers: &StringRecord) -> BalanceResult<Self> {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, h)| (h.trim().to_lowercase(), idx))
            .collect();

        let find = |names: &[&str]| names.iter().find_map(|n| positions.get(*n).copied());
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| {
                BalanceError::Import(format!("CSV header is missing a '{}' column", names[0]))
            })
        };

        Ok(Self {
            date: require(&["date", "fecha", "occurred_on"])?,
            kind: require(&["type", "tipo", "kind"])?,
            amount: require(&["amount", "monto"])?,
            category: find(&["category", "categoria", "categoría"]),
            person: find(&["person", "persona"]),
            note: find(&["note", "nota", "memo"]),
        })
    }

    fn raw(&self, record: &StringRecord) -> RawTransaction {
        let field = |idx: usize| record.get(idx).map(|s| s.trim().to_string());
        let optional = |idx: Option<usize>| idx.and_then(field).filter(|s| !s.is_empty());

        RawTransaction {
            date: field(self.date).unwrap_or_default(),
            kind: field(self.kind).unwrap_or_default(),
            amount: RawAmount::Text(field(self.amount).unwrap_or_default()),
            category: optional(self.category),
            person: optional(self.person),
            note: optional(self.note),
        }
    }
}

/// Parse CSV transactions from any reader.
///
/// The first row must be a header naming at least `date`, `type` and
/// `amount` columns (Spanish names `fecha`, `tipo`, `monto` also work).
pub fn parse_transactions_csv<R: std::io::Read>(
    reader: R,
    date_format: &str,
) -> BalanceResult<Vec<Transaction>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = CsvColumns::from_headers(&headers)?;

    let mut transactions = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        // Line numbers count the header
        let location = format!("row {}", idx + 2);
        let record = record
            .map_err(|e| BalanceError::Import(format!("{}: {}", location, e)))?;

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let txn = columns
            .raw(&record)
            .into_transaction(&location, date_format)?;
        transactions.push(txn);
    }

    Ok(transactions)
}
