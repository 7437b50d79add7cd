use std::sync::RwLock;

use tally_core::TransactionId;
use tally_ledger::{NewTransaction, Transaction};

use super::{StoreError, TransactionStore};

/// In-memory append-only transaction store.
///
/// Intended for tests/dev. Contents vanish with the value.
#[derive(Debug, Default)]
pub struct InMemoryTransactionStore {
    rows: RwLock<Vec<Transaction>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store, as if `history` had been appended earlier.
    pub fn with_history(history: Vec<Transaction>) -> Self {
        Self {
            rows: RwLock::new(history),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionStore for InMemoryTransactionStore {
    fn append(&self, transaction: NewTransaction) -> Result<TransactionId, StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let next = rows.last().map(|t| t.id.get()).unwrap_or(0) + 1;
        let id = TransactionId::new(next);
        rows.push(Transaction::from_new(id, transaction));
        Ok(id)
    }

    fn load_all(&self) -> Result<Vec<Transaction>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(rows.clone())
    }
}
