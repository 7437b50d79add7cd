//! Money amounts: parsing user input and rendering for display.
//!
//! Amounts are `rust_decimal::Decimal` throughout; there is no currency
//! dimension, the tracker works in a single implicit currency.

use core::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{DomainError, DomainResult};

/// Parse a user-supplied amount.
///
/// Accepts surrounding whitespace and an optional leading `$`. The sign is
/// preserved: rejecting negative amounts is the ledger's decision, not the
/// parser's.
pub fn parse_amount(raw: &str) -> DomainResult<Decimal> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim_start();
    if digits.is_empty() {
        return Err(DomainError::validation("amount is empty"));
    }
    Decimal::from_str(digits)
        .map_err(|e| DomainError::validation(format!("'{trimmed}' is not a number: {e}")))
}

/// Render an amount as `$1234.50` (two decimal places).
pub fn format_money(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}
