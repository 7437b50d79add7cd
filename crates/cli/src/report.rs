//! Summary and history output for the one-shot subcommands.

use std::io::{self, Write};

use tally_core::format_money;
use tally_ledger::{Summary, Transaction};

/// Summary as the text block, or as pretty JSON (amounts as decimal strings).
pub fn write_summary<W: Write>(out: &mut W, summary: &Summary, json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, summary)?;
        writeln!(out)
    } else {
        writeln!(out, "{summary}")
    }
}

pub fn write_history<W: Write>(out: &mut W, transactions: &[Transaction]) -> io::Result<()> {
    if transactions.is_empty() {
        return writeln!(out, "No transactions recorded yet.");
    }

    writeln!(
        out,
        "{:>5}  {:<16}  {:<7}  {:<12}  {:<24}  {:>12}  {:>12}",
        "id", "date", "kind", "category", "description", "amount", "remaining"
    )?;
    for tx in transactions {
        writeln!(
            out,
            "{:>5}  {:<16}  {:<7}  {:<12}  {:<24}  {:>12}  {:>12}",
            tx.id,
            tx.occurred_at.format("%Y-%m-%d %H:%M"),
            tx.kind,
            tx.category,
            tx.description,
            format_money(tx.amount),
            format_money(tx.remaining_balance),
        )?;
    }
    Ok(())
}
