//! `tally-cli`
//!
//! **Responsibility:** the terminal surface of the budget tracker.
//!
//! This crate provides:
//! - command-line arguments layered over the environment configuration
//! - the interactive prompt loop (add income, add expense, summary, exit)
//! - the sample procedure and the history listing

pub mod args;
pub mod prompt;
pub mod report;
pub mod sample;

pub use args::{Cli, Command};
pub use prompt::{Prompt, Session};
