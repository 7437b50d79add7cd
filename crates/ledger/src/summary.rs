//! Budget summary report.

use rust_decimal::Decimal;
use serde::Serialize;

use tally_core::{ValueObject, format_money};

use crate::ledger::ExpenseEntry;

/// Sum of all expenses filed under one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

impl ValueObject for CategoryTotal {}

/// Point-in-time report over a ledger.
///
/// Categories appear in order of their first expense. Totals saturate at the
/// `Decimal` bounds; a `Ledger` never holds entries that reach them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub income_total: Decimal,
    pub categories: Vec<CategoryTotal>,
    pub total_expenses: Decimal,
    pub remaining_balance: Decimal,
}

impl Summary {
    pub fn from_entries(income_total: Decimal, expenses: &[ExpenseEntry]) -> Self {
        let mut categories: Vec<CategoryTotal> = Vec::new();
        let mut total_expenses = Decimal::ZERO;

        for entry in expenses {
            total_expenses = total_expenses.saturating_add(entry.amount);
            match categories.iter_mut().find(|c| c.category == entry.category) {
                Some(existing) => existing.total = existing.total.saturating_add(entry.amount),
                None => categories.push(CategoryTotal {
                    category: entry.category.clone(),
                    total: entry.amount,
                }),
            }
        }

        Self {
            income_total,
            categories,
            total_expenses,
            remaining_balance: income_total.saturating_sub(total_expenses),
        }
    }

    pub fn category_total(&self, category: &str) -> Option<Decimal> {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.total)
    }
}

impl core::fmt::Display for Summary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "--- Budget Summary ---")?;
        writeln!(f, "Total Income: {}", format_money(self.income_total))?;
        writeln!(f, "Expenses:")?;
        for c in &self.categories {
            writeln!(f, "  {} - {}", c.category, format_money(c.total))?;
        }
        writeln!(f, "Total Expenses: {}", format_money(self.total_expenses))?;
        write!(f, "Remaining Budget: {}", format_money(self.remaining_balance))
    }
}
