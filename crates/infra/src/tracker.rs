//! Budget tracker: the ledger wired to its store.
//!
//! ```text
//! open:     store.load_all() → Ledger::initialize(seed, history)
//! command:  ledger.handle(cmd) → ledger.apply(event) → store.append(record)
//! report:   ledger.summarize()   (memory only, never reads snapshots)
//! ```
//!
//! The in-memory update and the append are not atomic: when the append fails
//! the ledger already reflects the command for the rest of the session, and
//! the next start rebuilds from what actually reached the store.

use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{error, info, warn};

use tally_core::{Aggregate, DomainError, Event, TransactionId, UserName};
use tally_ledger::{
    AddExpense, AddIncome, INCOME_CATEGORY, Ledger, LedgerCommand, LedgerEvent, NewTransaction,
    Summary, Transaction, TransactionKind,
};

use crate::config::{SeedPolicy, TrackerConfig};
use crate::store::{StoreError, TransactionStore};

/// Description of the record written by [`SeedPolicy::FirstRun`].
pub const INITIAL_INCOME_DESCRIPTION: &str = "Initial income";

#[derive(Debug, Error)]
pub enum TrackerError {
    /// The command failed validation (or the stored history could not be
    /// replayed); nothing changed.
    #[error("rejected: {0}")]
    Rejected(#[from] DomainError),

    /// The store failed; the command did not reach durable storage.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One user's ledger plus the store it is persisted to.
#[derive(Debug)]
pub struct BudgetTracker<S> {
    user: UserName,
    ledger: Ledger,
    store: S,
}

impl<S> BudgetTracker<S>
where
    S: TransactionStore,
{
    /// Load the history and rebuild the ledger according to `seed_policy`.
    pub fn open(
        user: UserName,
        store: S,
        initial_income: Decimal,
        seed_policy: SeedPolicy,
    ) -> Result<Self, TrackerError> {
        let mut history = store.load_all()?;

        let seed = match seed_policy {
            SeedPolicy::EveryStart => initial_income,
            SeedPolicy::FirstRun => {
                if history.is_empty() && initial_income > Decimal::ZERO {
                    let record = NewTransaction {
                        occurred_at: Utc::now(),
                        kind: TransactionKind::Income,
                        category: INCOME_CATEGORY.to_string(),
                        description: INITIAL_INCOME_DESCRIPTION.to_string(),
                        amount: initial_income,
                        remaining_balance: initial_income,
                    };
                    let id = store.append(record.clone())?;
                    info!(
                        user = %user,
                        id = %id,
                        amount = %initial_income,
                        "recorded initial income"
                    );
                    history.push(Transaction::from_new(id, record));
                }
                Decimal::ZERO
            }
        };

        let ledger = Ledger::initialize(seed, &history).inspect_err(|err| {
            error!(user = %user, error = %err, "stored history cannot be loaded");
        })?;

        info!(
            user = %user,
            seed = %seed,
            seed_policy = %seed_policy,
            loaded = history.len(),
            income_total = %ledger.income_total(),
            "initialized budget tracker"
        );

        Ok(Self {
            user,
            ledger,
            store,
        })
    }

    pub fn from_config(
        user: UserName,
        store: S,
        config: &TrackerConfig,
    ) -> Result<Self, TrackerError> {
        Self::open(user, store, config.initial_income, config.seed_policy)
    }

    pub fn add_income(&mut self, amount: Decimal) -> Result<TransactionId, TrackerError> {
        self.execute(LedgerCommand::AddIncome(AddIncome {
            amount,
            occurred_at: Utc::now(),
        }))
    }

    pub fn add_expense(
        &mut self,
        category: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<TransactionId, TrackerError> {
        self.execute(LedgerCommand::AddExpense(AddExpense {
            category: category.to_string(),
            amount,
            description: description.to_string(),
            occurred_at: Utc::now(),
        }))
    }

    pub fn summarize(&self) -> Summary {
        self.ledger.summarize()
    }

    /// Every stored record, re-read from the store.
    pub fn history(&self) -> Result<Vec<Transaction>, TrackerError> {
        Ok(self.store.load_all()?)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn user(&self) -> &UserName {
        &self.user
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn execute(&mut self, command: LedgerCommand) -> Result<TransactionId, TrackerError> {
        let events = match self.ledger.handle(&command) {
            Ok(events) => events,
            Err(err) => {
                warn!(user = %self.user, error = %err, "command rejected");
                return Err(err.into());
            }
        };

        let mut last = None;
        for event in &events {
            self.ledger.apply(event);

            let id = self.store.append(event.to_transaction()).map_err(|err| {
                error!(user = %self.user, error = %err, "failed to persist transaction");
                err
            })?;

            match event {
                LedgerEvent::IncomeAdded(e) => info!(
                    event = event.event_type(),
                    user = %self.user,
                    id = %id,
                    amount = %e.amount,
                    income_total = %self.ledger.income_total(),
                    remaining_balance = %e.remaining_balance,
                    "added income"
                ),
                LedgerEvent::ExpenseAdded(e) => info!(
                    event = event.event_type(),
                    user = %self.user,
                    id = %id,
                    category = %e.entry.category,
                    description = %e.entry.description,
                    amount = %e.entry.amount,
                    remaining_balance = %e.remaining_balance,
                    "added expense"
                ),
            }

            last = Some(id);
        }

        last.ok_or_else(|| DomainError::invariant("command produced no events").into())
    }
}
