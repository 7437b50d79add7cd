//! Scripted sample procedure.

use rust_decimal::Decimal;

use tally_infra::{BudgetTracker, TrackerError, TransactionStore};

use crate::prompt::{NECESSITY, WANT};

/// Income and expenses recorded by `tally sample`, in order.
pub fn sample_income() -> Decimal {
    Decimal::new(1500_00, 2)
}

pub fn sample_expenses() -> [(&'static str, Decimal, &'static str); 3] {
    [
        (NECESSITY, Decimal::new(300_00, 2), "Groceries"),
        (NECESSITY, Decimal::new(150_00, 2), "Utilities"),
        (WANT, Decimal::new(100_00, 2), "Entertainment"),
    ]
}

pub fn add_sample_data<S>(tracker: &mut BudgetTracker<S>) -> Result<(), TrackerError>
where
    S: TransactionStore,
{
    tracker.add_income(sample_income())?;
    for (category, amount, description) in sample_expenses() {
        tracker.add_expense(category, amount, description)?;
    }
    Ok(())
}
