//! Append-only transaction store boundary.
//!
//! `TransactionStore` is the persistence layer for one user's history. It
//! provides exactly two operations: append one record, and load everything in
//! write order.
//!
//! ## Append Semantics
//!
//! `append()`:
//! - persists one immutable record (no update, no delete anywhere)
//! - assigns the next identifier (unique, monotonically increasing)
//! - surfaces every failure to the caller; nothing is retried or swallowed
//!
//! ## Load Semantics
//!
//! `load_all()`:
//! - returns every record ever appended, ordered by identifier
//! - returns an empty vector for a fresh store

pub mod in_memory;
pub mod record;
pub mod sqlite;

use thiserror::Error;

use tally_core::TransactionId;
use tally_ledger::{NewTransaction, Transaction};

pub use in_memory::InMemoryTransactionStore;
pub use sqlite::SqliteTransactionStore;

/// Transaction store operation error.
///
/// These are **infrastructure errors** (IO, database, corrupt rows) as opposed
/// to domain errors (validation).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to prepare storage location: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("stored record {id} is malformed: {reason}")]
    Corrupt { id: i64, reason: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only, single-user transaction store.
pub trait TransactionStore {
    /// Append one record; returns the identifier assigned to it.
    fn append(&self, transaction: NewTransaction) -> Result<TransactionId, StoreError>;

    /// Load the full history in write order.
    fn load_all(&self) -> Result<Vec<Transaction>, StoreError>;
}

impl<S> TransactionStore for &S
where
    S: TransactionStore + ?Sized,
{
    fn append(&self, transaction: NewTransaction) -> Result<TransactionId, StoreError> {
        (**self).append(transaction)
    }

    fn load_all(&self) -> Result<Vec<Transaction>, StoreError> {
        (**self).load_all()
    }
}
