//! Budget ledger (income total + expense list, event-driven).
//!
//! Pure domain logic only: no IO, no terminal, no persistence concerns.

pub mod ledger;
pub mod summary;
pub mod transaction;

pub use ledger::{
    AddExpense, AddIncome, ExpenseAdded, ExpenseEntry, IncomeAdded, Ledger, LedgerCommand,
    LedgerEvent,
};
pub use summary::{CategoryTotal, Summary};
pub use transaction::{
    INCOME_CATEGORY, INCOME_DESCRIPTION, NewTransaction, Transaction, TransactionKind,
};
