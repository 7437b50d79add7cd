//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use tally_infra::{SeedPolicy, TrackerConfig};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SeedPolicyArg {
    /// Add the initial income on every start (on top of stored income).
    EveryStart,
    /// Store the initial income once, when the user's history is empty.
    FirstRun,
}

impl From<SeedPolicyArg> for SeedPolicy {
    fn from(value: SeedPolicyArg) -> Self {
        match value {
            SeedPolicyArg::EveryStart => SeedPolicy::EveryStart,
            SeedPolicyArg::FirstRun => SeedPolicy::FirstRun,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Personal budget tracker")]
pub struct Cli {
    /// Whose budget to open (prompted for when omitted)
    #[arg(short = 'u', long = "user")]
    pub user: Option<String>,

    /// Initial income [env: TALLY_INITIAL_INCOME]
    #[arg(long = "initial-income", value_name = "DECIMAL")]
    pub initial_income: Option<Decimal>,

    /// Directory of the per-user databases [env: TALLY_DATA_DIR]
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log file [env: TALLY_LOG_FILE]
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset [env: TALLY_LOG_LEVEL]
    #[arg(long = "log-level", value_name = "FILTER")]
    pub log_level: Option<String>,

    /// How the initial income combines with stored history [env: TALLY_SEED_POLICY]
    #[arg(long = "seed-policy", value_enum)]
    pub seed_policy: Option<SeedPolicyArg>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Interactive prompt (default)
    Interactive,
    /// Record a fixed set of sample transactions, then print the summary
    Sample,
    /// Print the budget summary and exit
    Summary {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List every stored transaction
    History,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut TrackerConfig) {
        if let Some(income) = self.initial_income {
            config.initial_income = income;
        }
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(file) = &self.log_file {
            config.log_file = Some(file.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(policy) = self.seed_policy {
            config.seed_policy = policy.into();
        }
    }

    pub fn selected_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Interactive)
    }
}
