//! Interactive prompt loop.
//!
//! Reads one answer per line. End of input behaves like a confirmed exit, so
//! piping a script into the binary terminates cleanly.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use tracing::{error, info, warn};

use tally_core::{DomainError, UserName, format_money, parse_amount};
use tally_infra::{BudgetTracker, TrackerError, TransactionStore};

pub const NECESSITY: &str = "Necessity";
pub const WANT: &str = "Want";

/// Line-oriented question/answer channel.
#[derive(Debug)]
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R, W> Prompt<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `question` and read one line; `None` at end of input.
    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Ask until a usable user name is given; `None` at end of input.
pub fn ask_user_name<R, W>(prompt: &mut Prompt<R, W>) -> io::Result<Option<UserName>>
where
    R: BufRead,
    W: Write,
{
    loop {
        let Some(raw) = prompt.ask("Enter your name to access your budget tracker: ")? else {
            return Ok(None);
        };
        match UserName::parse(&raw) {
            Ok(name) => return Ok(Some(name)),
            Err(err) => {
                warn!(error = %err, "invalid user name");
                prompt.say(format!("Invalid name: {}", describe(&err)))?;
            }
        }
    }
}

enum Step {
    Continue,
    Exit,
}

/// The menu loop bound to one tracker.
pub struct Session<'a, S, R, W> {
    tracker: &'a mut BudgetTracker<S>,
    prompt: Prompt<R, W>,
}

impl<'a, S, R, W> Session<'a, S, R, W>
where
    S: TransactionStore,
    R: BufRead,
    W: Write,
{
    pub fn new(tracker: &'a mut BudgetTracker<S>, prompt: Prompt<R, W>) -> Self {
        Self { tracker, prompt }
    }

    /// Run until the user confirms exit or input ends.
    ///
    /// Only terminal IO errors end the loop early; every tracker failure is
    /// reported and the menu is shown again.
    pub fn run(mut self) -> io::Result<Prompt<R, W>> {
        loop {
            self.show_menu()?;
            let Some(choice) = self.prompt.ask("Choose an option (1-4): ")? else {
                info!(user = %self.tracker.user(), "input closed, leaving budget tracker");
                return Ok(self.prompt);
            };

            let step = match choice.trim() {
                "1" => self.add_income()?,
                "2" => self.add_expense()?,
                "3" => {
                    self.prompt.say("")?;
                    self.prompt.say(self.tracker.summarize())?;
                    Step::Continue
                }
                "4" => self.confirm_exit()?,
                _ => {
                    warn!(choice = %choice, "invalid option chosen");
                    self.prompt.say("Invalid option. Please choose again.")?;
                    Step::Continue
                }
            };

            if let Step::Exit = step {
                return Ok(self.prompt);
            }
        }
    }

    fn show_menu(&mut self) -> io::Result<()> {
        self.prompt.say("\nOptions:")?;
        self.prompt.say("1. Add Income")?;
        self.prompt.say("2. Add Expense")?;
        self.prompt.say("3. Display Budget")?;
        self.prompt.say("4. Exit")
    }

    fn add_income(&mut self) -> io::Result<Step> {
        let Some(raw) = self.prompt.ask("Enter income amount: ")? else {
            return Ok(Step::Exit);
        };
        let amount = match parse_amount(&raw) {
            Ok(amount) => amount,
            Err(err) => {
                error!(error = %err, "invalid input for income amount");
                self.prompt.say("Invalid input! Please enter a numeric value.")?;
                return Ok(Step::Continue);
            }
        };

        match self.tracker.add_income(amount) {
            Ok(_) => {
                let ledger = self.tracker.ledger();
                let text = format!(
                    "Added income: {}. Total income: {}. Remaining budget: {}",
                    format_money(amount),
                    format_money(ledger.income_total()),
                    format_money(ledger.remaining_balance()),
                );
                self.prompt.say(text)?;
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Step::Continue)
    }

    fn add_expense(&mut self) -> io::Result<Step> {
        let category = loop {
            let Some(choice) = self.prompt.ask("Choose category (1 - Necessity, 2 - Want): ")?
            else {
                return Ok(Step::Exit);
            };
            match choice.trim() {
                "1" => break NECESSITY,
                "2" => break WANT,
                _ => {
                    warn!(choice = %choice, "invalid category choice");
                    self.prompt.say("Invalid choice. Please choose 1 or 2.")?;
                }
            }
        };

        let Some(raw) = self.prompt.ask("Enter expense amount: ")? else {
            return Ok(Step::Exit);
        };
        let amount = match parse_amount(&raw) {
            Ok(amount) => amount,
            Err(err) => {
                error!(error = %err, "invalid input for expense amount");
                self.prompt
                    .say("Invalid input! Please enter a numeric value for the expense amount.")?;
                return Ok(Step::Continue);
            }
        };

        let Some(description) = self
            .prompt
            .ask("Enter a brief description of the expense: ")?
        else {
            return Ok(Step::Exit);
        };

        match self.tracker.add_expense(category, amount, &description) {
            Ok(_) => {
                let text = format!(
                    "Added expense: {} in category '{}'. Remaining budget: {}",
                    format_money(amount),
                    category,
                    format_money(self.tracker.ledger().remaining_balance()),
                );
                self.prompt.say(text)?;
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Step::Continue)
    }

    fn confirm_exit(&mut self) -> io::Result<Step> {
        let Some(answer) = self.prompt.ask("Are you sure you want to exit? (y/n): ")? else {
            return Ok(Step::Exit);
        };
        if answer.trim().eq_ignore_ascii_case("y") {
            info!(user = %self.tracker.user(), "exiting the budget tracker");
            self.prompt.say("Exiting the budget tracker. Goodbye!")?;
            return Ok(Step::Exit);
        }
        Ok(Step::Continue)
    }

    fn report(&mut self, err: &TrackerError) -> io::Result<()> {
        match err {
            TrackerError::Rejected(domain) => self.prompt.say(describe(domain)),
            TrackerError::Store(store) => self.prompt.say(format!(
                "Could not save the transaction ({store}). Please try again."
            )),
        }
    }
}

/// `income cannot be negative` → `Income cannot be negative.`
fn describe(err: &DomainError) -> String {
    let msg = match err {
        DomainError::Validation(msg)
        | DomainError::InvariantViolation(msg)
        | DomainError::InvalidId(msg) => msg.as_str(),
    };
    let mut chars = msg.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_capitalizes_and_terminates() {
        let err = DomainError::validation("expense cannot be negative");
        assert_eq!(describe(&err), "Expense cannot be negative.");
    }

    #[test]
    fn ask_returns_none_at_end_of_input() {
        let mut prompt = Prompt::new(&b""[..], Vec::new());
        assert_eq!(prompt.ask("? ").unwrap(), None);
    }

    #[test]
    fn ask_strips_line_endings() {
        let mut prompt = Prompt::new(&b"42\r\n"[..], Vec::new());
        assert_eq!(prompt.ask("? ").unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn user_name_is_asked_again_until_valid() {
        let mut prompt = Prompt::new(&b"../etc\nalice\n"[..], Vec::new());
        let name = ask_user_name(&mut prompt).unwrap().unwrap();
        assert_eq!(name.as_str(), "alice");
        let out = String::from_utf8(prompt.into_output()).unwrap();
        assert!(out.contains("Invalid name"));
    }
}
