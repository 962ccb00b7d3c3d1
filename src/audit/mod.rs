//! Audit logging for savings goals and debts
//!
//! Every goal or debt written by `balance init`, every goal changed by
//! `balance savings --apply` and every debt payment is recorded with
//! before/after snapshots in an append-only JSONL log.
//!
//! # Example
//!
//! ```rust,ignore
//! use balance::audit::{AuditEntry, AuditLogger};
//! use balance::models::RunId;
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! let run = RunId::new();
//! logger.log(&AuditEntry::allocate(run, &before, &after))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
