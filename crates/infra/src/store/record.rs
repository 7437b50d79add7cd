//! Row contract for the `transactions` table.
//!
//! Every column is written and read explicitly here. Amounts are stored as
//! decimal text so no precision is lost on the way through SQLite; timestamps
//! are RFC 3339 text.
//!
//! | column              | type    | content                                |
//! |---------------------|---------|----------------------------------------|
//! | `id`                | INTEGER | auto-assigned, monotonically increasing |
//! | `date`              | TEXT    | write instant, RFC 3339 UTC            |
//! | `category`          | TEXT    | free text                              |
//! | `description`       | TEXT    | free text                              |
//! | `amount`            | TEXT    | non-negative decimal                   |
//! | `kind`              | TEXT    | `Income` or `Expense`                  |
//! | `remaining_balance` | TEXT    | decimal snapshot, may be negative      |

use core::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;

use tally_core::TransactionId;
use tally_ledger::{NewTransaction, Transaction, TransactionKind};

use super::StoreError;

pub const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS transactions (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        date              TEXT NOT NULL,
        category          TEXT NOT NULL,
        description       TEXT NOT NULL,
        amount            TEXT NOT NULL,
        kind              TEXT NOT NULL,
        remaining_balance TEXT NOT NULL
    )
"#;

pub const INSERT_SQL: &str = r#"
    INSERT INTO transactions (
        date,
        category,
        description,
        amount,
        kind,
        remaining_balance
    )
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
"#;

pub const SELECT_ALL_SQL: &str = r#"
    SELECT id, date, category, description, amount, kind, remaining_balance
    FROM transactions
    ORDER BY id ASC
"#;

/// Column values for one insert, in `INSERT_SQL` bind order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRow {
    pub date: String,
    pub category: String,
    pub description: String,
    pub amount: String,
    pub kind: &'static str,
    pub remaining_balance: String,
}

/// Column values of one stored row, as read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub id: i64,
    pub date: String,
    pub category: String,
    pub description: String,
    pub amount: String,
    pub kind: String,
    pub remaining_balance: String,
}

pub fn encode(tx: &NewTransaction) -> EncodedRow {
    EncodedRow {
        date: tx.occurred_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        category: tx.category.clone(),
        description: tx.description.clone(),
        amount: tx.amount.to_string(),
        kind: tx.kind.as_str(),
        remaining_balance: tx.remaining_balance.to_string(),
    }
}

pub fn decode(raw: RawRow) -> Result<Transaction, StoreError> {
    let id = raw.id;
    let corrupt = |reason: String| StoreError::Corrupt { id, reason };

    let occurred_at = DateTime::parse_from_rfc3339(&raw.date)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| corrupt(format!("invalid date '{}': {e}", raw.date)))?;
    let amount = Decimal::from_str(&raw.amount)
        .map_err(|e| corrupt(format!("invalid amount '{}': {e}", raw.amount)))?;
    let remaining_balance = Decimal::from_str(&raw.remaining_balance).map_err(|e| {
        corrupt(format!(
            "invalid remaining balance '{}': {e}",
            raw.remaining_balance
        ))
    })?;
    let kind = TransactionKind::from_str(&raw.kind).map_err(|e| corrupt(e.to_string()))?;

    Ok(Transaction {
        id: TransactionId::new(id),
        occurred_at,
        kind,
        category: raw.category,
        description: raw.description,
        amount,
        remaining_balance,
    })
}
