//! Infrastructure layer: storage, configuration and the tracker wiring.

pub mod config;
pub mod store;
pub mod tracker;


pub use config::{ConfigError, SeedPolicy, TrackerConfig};
pub use store::{
    InMemoryTransactionStore, SqliteTransactionStore, StoreError, TransactionStore,
};
pub use tracker::{BudgetTracker, TrackerError};
