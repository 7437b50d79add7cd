use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tally_core::{Aggregate, DomainError, DomainResult, Event, ValueObject};

use crate::summary::Summary;
use crate::transaction::{
    INCOME_CATEGORY, INCOME_DESCRIPTION, NewTransaction, Transaction, TransactionKind,
};

/// One expense as the ledger sees it (no id, no timestamp).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub category: String,
    pub amount: Decimal,
    pub description: String,
}

impl ValueObject for ExpenseEntry {}

/// Aggregate: the in-memory budget of one user for one session.
///
/// Built from the configured seed plus the stored history, then evolved by
/// `IncomeAdded` / `ExpenseAdded` events. Nothing here is persisted directly;
/// events are turned into `NewTransaction`s by the caller.
///
/// Invariant: `income_total`, `expenses_total` and their difference are all
/// representable as a `Decimal`. Commands that would break it are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    income_total: Decimal,
    expenses_total: Decimal,
    expenses: Vec<ExpenseEntry>,
    version: u64,
}

impl Ledger {
    /// Empty ledger holding only the seed income.
    pub fn new(initial_income: Decimal) -> Self {
        Self {
            income_total: initial_income,
            expenses_total: Decimal::ZERO,
            expenses: Vec::new(),
            version: 0,
        }
    }

    /// Rebuild a ledger from a seed and a stored history (in write order).
    ///
    /// The seed is added on top of whatever income the history holds. Callers
    /// that do not want the seed re-applied on every start pass zero (see the
    /// seed policy in `tally-infra`).
    ///
    /// Fails when the totals no longer fit in a `Decimal`.
    pub fn initialize(initial_income: Decimal, history: &[Transaction]) -> DomainResult<Self> {
        let mut ledger = Self::new(initial_income);
        for tx in history {
            ledger.absorb(tx)?;
        }
        Ok(ledger)
    }

    pub fn income_total(&self) -> Decimal {
        self.income_total
    }

    pub fn expenses(&self) -> &[ExpenseEntry] {
        &self.expenses
    }

    pub fn total_expenses(&self) -> Decimal {
        self.expenses_total
    }

    /// Freshly computed; never read back from a stored snapshot.
    pub fn remaining_balance(&self) -> Decimal {
        self.income_total.saturating_sub(self.expenses_total)
    }

    pub fn summarize(&self) -> Summary {
        Summary::from_entries(self.income_total, &self.expenses)
    }

    fn absorb(&mut self, tx: &Transaction) -> DomainResult<()> {
        let overflow = || {
            DomainError::invariant(format!(
                "stored transaction {} overflows the budget totals",
                tx.id
            ))
        };

        let (income_delta, expense_delta) = match tx.kind {
            TransactionKind::Income => (tx.amount, Decimal::ZERO),
            TransactionKind::Expense => (Decimal::ZERO, tx.amount),
        };
        let (income_total, expenses_total, _) = checked_totals(
            self.income_total,
            income_delta,
            self.expenses_total,
            expense_delta,
        )
        .ok_or_else(overflow)?;

        self.income_total = income_total;
        self.expenses_total = expenses_total;
        if tx.kind == TransactionKind::Expense {
            self.expenses.push(ExpenseEntry {
                category: tx.category.clone(),
                amount: tx.amount,
                description: tx.description.clone(),
            });
        }
        self.version += 1;
        Ok(())
    }
}

/// New `(income, expenses, balance)`, or `None` when any of them would
/// overflow.
fn checked_totals(
    income_total: Decimal,
    income_delta: Decimal,
    expenses_total: Decimal,
    expenses_delta: Decimal,
) -> Option<(Decimal, Decimal, Decimal)> {
    let income_total = income_total.checked_add(income_delta)?;
    let expenses_total = expenses_total.checked_add(expenses_delta)?;
    let balance = income_total.checked_sub(expenses_total)?;
    Some((income_total, expenses_total, balance))
}

/// Command: AddIncome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddIncome {
    pub amount: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddExpense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddExpense {
    pub category: String,
    pub amount: Decimal,
    pub description: String,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCommand {
    AddIncome(AddIncome),
    AddExpense(AddExpense),
}

/// Event: IncomeAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeAdded {
    pub amount: Decimal,
    pub remaining_balance: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ExpenseAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseAdded {
    pub entry: ExpenseEntry,
    pub remaining_balance: Decimal,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    IncomeAdded(IncomeAdded),
    ExpenseAdded(ExpenseAdded),
}

impl LedgerEvent {
    /// The durable record describing this event.
    pub fn to_transaction(&self) -> NewTransaction {
        match self {
            LedgerEvent::IncomeAdded(e) => NewTransaction {
                occurred_at: e.occurred_at,
                kind: TransactionKind::Income,
                category: INCOME_CATEGORY.to_string(),
                description: INCOME_DESCRIPTION.to_string(),
                amount: e.amount,
                remaining_balance: e.remaining_balance,
            },
            // Category is kept verbatim, even when it reads "Income": the kind tag decides.
            LedgerEvent::ExpenseAdded(e) => NewTransaction {
                occurred_at: e.occurred_at,
                kind: TransactionKind::Expense,
                category: e.entry.category.clone(),
                description: e.entry.description.clone(),
                amount: e.entry.amount,
                remaining_balance: e.remaining_balance,
            },
        }
    }
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::IncomeAdded(_) => "ledger.income_added",
            LedgerEvent::ExpenseAdded(_) => "ledger.expense_added",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::IncomeAdded(e) => e.occurred_at,
            LedgerEvent::ExpenseAdded(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Ledger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    // `handle` has already checked that the new totals fit.
    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::IncomeAdded(e) => {
                self.income_total = self.income_total.saturating_add(e.amount);
            }
            LedgerEvent::ExpenseAdded(e) => {
                self.expenses_total = self.expenses_total.saturating_add(e.entry.amount);
                self.expenses.push(e.entry.clone());
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::AddIncome(cmd) => self.handle_add_income(cmd),
            LedgerCommand::AddExpense(cmd) => self.handle_add_expense(cmd),
        }
    }
}

impl Ledger {
    fn handle_add_income(&self, cmd: &AddIncome) -> Result<Vec<LedgerEvent>, DomainError> {
        if cmd.amount < Decimal::ZERO {
            return Err(DomainError::validation("income cannot be negative"));
        }

        let (_, _, remaining_balance) =
            checked_totals(self.income_total, cmd.amount, self.expenses_total, Decimal::ZERO)
                .ok_or_else(|| DomainError::validation("amount too large"))?;

        Ok(vec![LedgerEvent::IncomeAdded(IncomeAdded {
            amount: cmd.amount,
            remaining_balance,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_expense(&self, cmd: &AddExpense) -> Result<Vec<LedgerEvent>, DomainError> {
        if cmd.amount < Decimal::ZERO {
            return Err(DomainError::validation("expense cannot be negative"));
        }

        let (_, _, remaining_balance) =
            checked_totals(self.income_total, Decimal::ZERO, self.expenses_total, cmd.amount)
                .ok_or_else(|| DomainError::validation("amount too large"))?;

        Ok(vec![LedgerEvent::ExpenseAdded(ExpenseAdded {
            entry: ExpenseEntry {
                category: cmd.category.clone(),
                amount: cmd.amount,
                description: cmd.description.clone(),
            },
            remaining_balance,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;
    use tally_core::TransactionId;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn income(amount: Decimal) -> LedgerCommand {
        LedgerCommand::AddIncome(AddIncome {
            amount,
            occurred_at: test_time(),
        })
    }

    fn expense(category: &str, amount: Decimal, description: &str) -> LedgerCommand {
        LedgerCommand::AddExpense(AddExpense {
            category: category.to_string(),
            amount,
            description: description.to_string(),
            occurred_at: test_time(),
        })
    }

    fn execute(ledger: &mut Ledger, cmd: LedgerCommand) -> Vec<LedgerEvent> {
        let events = ledger.handle(&cmd).unwrap();
        for e in &events {
            ledger.apply(e);
        }
        events
    }

    fn stored(id: i64, kind: TransactionKind, category: &str, amount: Decimal) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            occurred_at: test_time(),
            kind,
            category: category.to_string(),
            description: String::new(),
            amount,
            remaining_balance: Decimal::ZERO,
        }
    }

    #[test]
    fn income_then_expense_tracks_remaining_balance() {
        let mut ledger = Ledger::new(dec!(1500.00));

        let events = execute(&mut ledger, income(dec!(500.00)));
        assert_eq!(ledger.income_total(), dec!(2000.00));
        match &events[0] {
            LedgerEvent::IncomeAdded(e) => assert_eq!(e.remaining_balance, dec!(2000.00)),
            other => panic!("unexpected event {other:?}"),
        }

        let events = execute(&mut ledger, expense("Necessity", dec!(300.00), "Groceries"));
        assert_eq!(
            ledger.expenses(),
            &[ExpenseEntry {
                category: "Necessity".to_string(),
                amount: dec!(300.00),
                description: "Groceries".to_string(),
            }]
        );
        match &events[0] {
            LedgerEvent::ExpenseAdded(e) => assert_eq!(e.remaining_balance, dec!(1700.00)),
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(ledger.remaining_balance(), dec!(1700.00));
    }

    #[test]
    fn negative_income_is_rejected_without_events() {
        let ledger = Ledger::new(dec!(1500.00));
        let err = ledger.handle(&income(dec!(-50.00))).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("income cannot be negative") => {}
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(ledger.income_total(), dec!(1500.00));
        assert_eq!(ledger.version(), 0);
    }

    #[test]
    fn negative_expense_is_rejected() {
        let ledger = Ledger::new(dec!(100));
        assert!(matches!(
            ledger.handle(&expense("Want", dec!(-1), "refund")),
            Err(DomainError::Validation(_))
        ));
        assert!(ledger.expenses().is_empty());
    }

    #[test]
    fn zero_amounts_are_accepted() {
        let mut ledger = Ledger::new(dec!(10));
        execute(&mut ledger, income(Decimal::ZERO));
        execute(&mut ledger, expense("Want", Decimal::ZERO, "free sample"));
        assert_eq!(ledger.income_total(), dec!(10));
        assert_eq!(ledger.expenses().len(), 1);
    }

    #[test]
    fn expense_labelled_income_stays_an_expense() {
        let mut ledger = Ledger::new(dec!(100));
        let events = execute(&mut ledger, expense("Income", dec!(40), "odd label"));
        let record = events[0].to_transaction();
        assert_eq!(record.kind, TransactionKind::Expense);
        assert_eq!(record.category, "Income");
        assert_eq!(ledger.income_total(), dec!(100));
        assert_eq!(ledger.remaining_balance(), dec!(60));
    }

    #[test]
    fn income_record_uses_reserved_category() {
        let mut ledger = Ledger::new(Decimal::ZERO);
        let events = execute(&mut ledger, income(dec!(12.5)));
        let record = events[0].to_transaction();
        assert_eq!(record.kind, TransactionKind::Income);
        assert_eq!(record.category, INCOME_CATEGORY);
        assert_eq!(record.description, INCOME_DESCRIPTION);
        assert_eq!(record.amount, dec!(12.5));
    }

    #[test]
    fn initialize_adds_seed_on_top_of_loaded_income() {
        let history = vec![stored(1, TransactionKind::Income, INCOME_CATEGORY, dec!(500.00))];
        let ledger = Ledger::initialize(dec!(1500.00), &history).unwrap();
        assert_eq!(ledger.income_total(), dec!(2000.00));
        assert_eq!(ledger.version(), 1);
    }

    #[test]
    fn initialize_replays_expenses_in_write_order() {
        let history = vec![
            stored(1, TransactionKind::Expense, "Want", dec!(10)),
            stored(2, TransactionKind::Income, INCOME_CATEGORY, dec!(50)),
            stored(3, TransactionKind::Expense, "Necessity", dec!(20)),
            stored(4, TransactionKind::Expense, "Income", dec!(5)),
        ];
        let ledger = Ledger::initialize(Decimal::ZERO, &history).unwrap();
        let categories: Vec<&str> = ledger.expenses().iter().map(|e| e.category.as_str()).collect();
        assert_eq!(categories, vec!["Want", "Necessity", "Income"]);
        assert_eq!(ledger.income_total(), dec!(50));
        assert_eq!(ledger.remaining_balance(), dec!(15));
    }

    #[test]
    fn income_past_decimal_max_is_rejected() {
        let mut ledger = Ledger::new(Decimal::ZERO);
        execute(&mut ledger, income(Decimal::MAX));

        let err = ledger.handle(&income(dec!(1))).unwrap_err();
        assert_eq!(err, DomainError::validation("amount too large"));
        assert_eq!(ledger.income_total(), Decimal::MAX);
        assert_eq!(ledger.version(), 1);
    }

    #[test]
    fn expense_that_overflows_the_balance_is_rejected() {
        let mut ledger = Ledger::new(Decimal::ZERO);
        execute(&mut ledger, expense("Want", Decimal::MAX, "everything"));
        assert_eq!(ledger.remaining_balance(), -Decimal::MAX);

        assert!(matches!(
            ledger.handle(&expense("Want", dec!(1), "one more")),
            Err(DomainError::Validation(_))
        ));
        assert!(ledger.handle(&income(dec!(1))).is_ok());
        assert_eq!(ledger.expenses().len(), 1);
    }

    #[test]
    fn initialize_reports_overflowing_history() {
        let history = vec![stored(7, TransactionKind::Income, INCOME_CATEGORY, Decimal::MAX)];
        let err = Ledger::initialize(dec!(1), &history).unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) => assert!(msg.contains("transaction 7")),
            other => panic!("expected invariant violation, got {other:?}"),
        }
    }

    #[test]
    fn event_metadata_is_stable() {
        let ledger = Ledger::new(Decimal::ZERO);
        let events = ledger.handle(&income(dec!(1))).unwrap();
        assert_eq!(events[0].event_type(), "ledger.income_added");
        assert_eq!(Event::version(&events[0]), 1);
    }

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the remaining balance always equals income minus the sum of
        /// expenses, and every event's snapshot matches the state right after it.
        #[test]
        fn remaining_balance_matches_income_minus_expenses(
            seed in amount_strategy(),
            ops in prop::collection::vec((any::<bool>(), amount_strategy()), 0..40)
        ) {
            let mut ledger = Ledger::new(seed);

            for (is_income, amount) in ops {
                let cmd = if is_income {
                    income(amount)
                } else {
                    expense("Necessity", amount, "generated")
                };
                let before_len = ledger.expenses().len();
                let before_income = ledger.income_total();

                let events = execute(&mut ledger, cmd);
                prop_assert_eq!(events.len(), 1);

                let snapshot = match &events[0] {
                    LedgerEvent::IncomeAdded(e) => {
                        prop_assert_eq!(ledger.income_total(), before_income + amount);
                        e.remaining_balance
                    }
                    LedgerEvent::ExpenseAdded(e) => {
                        prop_assert_eq!(ledger.expenses().len(), before_len + 1);
                        e.remaining_balance
                    }
                };
                prop_assert_eq!(snapshot, ledger.remaining_balance());
            }

            let expected: Decimal = ledger.expenses().iter().map(|e| e.amount).sum();
            prop_assert_eq!(ledger.summarize().remaining_balance, ledger.income_total() - expected);
        }

        /// Property: negative submissions never change state.
        #[test]
        fn negative_amounts_leave_ledger_untouched(cents in 1i64..10_000_000i64) {
            let ledger = Ledger::new(dec!(100));
            let amount = -Decimal::new(cents, 2);
            prop_assert!(ledger.handle(&income(amount)).is_err());
            prop_assert!(ledger.handle(&expense("Want", amount, "x")).is_err());
            prop_assert_eq!(ledger, Ledger::new(dec!(100)));
        }
    }
}
