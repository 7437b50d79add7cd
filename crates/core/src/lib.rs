//! `tally-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no storage, no terminal IO).

pub mod aggregate;
pub mod error;
pub mod event;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::Aggregate;
pub use error::{DomainError, DomainResult};
pub use event::Event;
pub use id::{TransactionId, UserName};
pub use money::{format_money, parse_amount};
pub use value_object::ValueObject;
