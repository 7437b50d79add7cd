//! Structured logging setup.
//!
//! Logging is owned by an explicit [`LogSession`] value: opening one installs a
//! JSON-lines subscriber writing to a file for the current thread, dropping it
//! uninstalls the subscriber. Nothing is configured process-wide.

pub mod logging;

pub use logging::{LogError, LogSession};
