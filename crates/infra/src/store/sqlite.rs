//! SQLite-backed transaction store (one database file per user).

use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use tokio::runtime::{Builder, Runtime};

use tally_core::{TransactionId, UserName};
use tally_ledger::{NewTransaction, Transaction};

use super::record::{self, RawRow};
use super::{StoreError, TransactionStore};

/// File name suffix of every per-user database.
pub const DATABASE_SUFFIX: &str = "_budget_tracker.db";

/// Durable store for one user's transactions.
///
/// The public API is synchronous. Each call blocks on a private current-thread
/// runtime that drives the `sqlx` pool; the pool holds a single connection, so
/// writes are committed one statement at a time in call order.
#[derive(Debug)]
pub struct SqliteTransactionStore {
    pool: SqlitePool,
    path: PathBuf,
    runtime: Runtime,
}

impl SqliteTransactionStore {
    /// Open (or create) the store of `user` inside `data_dir`.
    pub fn open(data_dir: &Path, user: &UserName) -> Result<Self, StoreError> {
        Self::open_at(database_path(data_dir, user))
    }

    /// Open (or create) a store at an explicit file path.
    ///
    /// Creates the parent directory and the `transactions` table when they are
    /// missing; existing data is never touched.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let runtime = Builder::new_current_thread().enable_all().build()?;

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);

        let pool = runtime.block_on(async {
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options)
                .await?;

            sqlx::query(record::CREATE_TABLE_SQL).execute(&pool).await?;

            Ok::<_, sqlx::Error>(pool)
        })?;

        tracing::debug!(path = %path.display(), "opened transaction store");

        Ok(Self {
            pool,
            path,
            runtime,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TransactionStore for SqliteTransactionStore {
    fn append(&self, transaction: NewTransaction) -> Result<TransactionId, StoreError> {
        let row = record::encode(&transaction);

        let result = self.runtime.block_on(
            sqlx::query(record::INSERT_SQL)
                .bind(&row.date)
                .bind(&row.category)
                .bind(&row.description)
                .bind(&row.amount)
                .bind(row.kind)
                .bind(&row.remaining_balance)
                .execute(&self.pool),
        )?;

        let id = TransactionId::new(result.last_insert_rowid());
        tracing::debug!(id = %id, kind = %transaction.kind, "appended transaction");
        Ok(id)
    }

    fn load_all(&self) -> Result<Vec<Transaction>, StoreError> {
        let rows = self
            .runtime
            .block_on(sqlx::query(record::SELECT_ALL_SQL).fetch_all(&self.pool))?;

        let mut transactions = Vec::with_capacity(rows.len());
        for row in rows {
            let raw = RawRow {
                id: row.try_get("id")?,
                date: row.try_get("date")?,
                category: row.try_get("category")?,
                description: row.try_get("description")?,
                amount: row.try_get("amount")?,
                kind: row.try_get("kind")?,
                remaining_balance: row.try_get("remaining_balance")?,
            };
            transactions.push(record::decode(raw)?);
        }

        tracing::debug!(
            path = %self.path.display(),
            count = transactions.len(),
            "loaded transactions"
        );
        Ok(transactions)
    }
}

impl Drop for SqliteTransactionStore {
    fn drop(&mut self) {
        self.runtime.block_on(self.pool.close());
    }
}

/// `{data_dir}/{user}_budget_tracker.db`.
pub fn database_path(data_dir: &Path, user: &UserName) -> PathBuf {
    data_dir.join(format!("{}{}", user.as_str(), DATABASE_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use tally_ledger::TransactionKind;

    /// Unique scratch directory, removed on drop.
    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("tally-store-{}", uuid::Uuid::now_v7()));
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn user(name: &str) -> UserName {
        UserName::parse(name).unwrap()
    }

    fn expense(category: &str, amount: rust_decimal::Decimal, description: &str) -> NewTransaction {
        NewTransaction {
            occurred_at: Utc::now(),
            kind: TransactionKind::Expense,
            category: category.to_string(),
            description: description.to_string(),
            amount,
            remaining_balance: dec!(0),
        }
    }

    #[test]
    fn database_file_is_named_after_user() {
        let path = database_path(Path::new("/data"), &user("alice"));
        assert_eq!(path, PathBuf::from("/data/alice_budget_tracker.db"));
    }

    #[test]
    fn open_creates_file_and_empty_table() {
        let dir = ScratchDir::new();
        let store = SqliteTransactionStore::open(&dir.0, &user("alice")).unwrap();
        assert!(store.path().exists());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn open_creates_missing_data_dir() {
        let dir = ScratchDir::new();
        let nested = dir.0.join("nested").join("deeper");
        let store = SqliteTransactionStore::open(&nested, &user("bob")).unwrap();
        assert!(store.path().starts_with(&nested));
    }

    #[test]
    fn appended_rows_load_in_write_order_with_increasing_ids() {
        let dir = ScratchDir::new();
        let store = SqliteTransactionStore::open(&dir.0, &user("alice")).unwrap();

        let first = store.append(expense("Necessity", dec!(300.00), "Groceries")).unwrap();
        let second = store.append(expense("Want", dec!(100.00), "Entertainment")).unwrap();
        assert!(second > first);

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, first);
        assert_eq!(all[0].category, "Necessity");
        assert_eq!(all[0].amount, dec!(300.00));
        assert_eq!(all[1].description, "Entertainment");
    }

    #[test]
    fn reopening_keeps_existing_rows() {
        let dir = ScratchDir::new();
        {
            let store = SqliteTransactionStore::open(&dir.0, &user("alice")).unwrap();
            store.append(expense("Want", dec!(9.99), "Snack")).unwrap();
        }

        let store = SqliteTransactionStore::open(&dir.0, &user("alice")).unwrap();
        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount, dec!(9.99));
    }

    #[test]
    fn users_do_not_share_history() {
        let dir = ScratchDir::new();
        let alice = SqliteTransactionStore::open(&dir.0, &user("alice")).unwrap();
        let bob = SqliteTransactionStore::open(&dir.0, &user("bob")).unwrap();

        alice.append(expense("Want", dec!(1), "a")).unwrap();

        assert_eq!(alice.load_all().unwrap().len(), 1);
        assert!(bob.load_all().unwrap().is_empty());
    }
}
