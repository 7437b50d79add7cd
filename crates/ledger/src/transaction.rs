//! Durable transaction records.
//!
//! A `Transaction` is one immutable line of a user's history. Its kind is an
//! explicit tag chosen when the record is created; the free-text category is
//! never consulted to decide whether a record is income or an expense.

use core::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tally_core::{DomainError, TransactionId};

/// Category label written on income records.
pub const INCOME_CATEGORY: &str = "Income";

/// Description written on income records.
pub const INCOME_DESCRIPTION: &str = "Added income";

/// Whether a record adds to income or to expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Income" => Ok(TransactionKind::Income),
            "Expense" => Ok(TransactionKind::Expense),
            other => Err(DomainError::validation(format!(
                "unknown transaction kind '{other}'"
            ))),
        }
    }
}

/// A record ready to be appended (not yet assigned an id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub occurred_at: DateTime<Utc>,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    /// Non-negative; the ledger rejects negative amounts before a record exists.
    pub amount: Decimal,
    /// income total minus expense total right after this record was applied.
    pub remaining_balance: Decimal,
}

/// A stored record (assigned an id by the store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub occurred_at: DateTime<Utc>,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub amount: Decimal,
    pub remaining_balance: Decimal,
}

impl Transaction {
    pub fn from_new(id: TransactionId, new: NewTransaction) -> Self {
        Self {
            id,
            occurred_at: new.occurred_at,
            kind: new.kind,
            category: new.category,
            description: new.description,
            amount: new.amount,
            remaining_balance: new.remaining_balance,
        }
    }
}
