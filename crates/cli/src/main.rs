//! `tally` entry point.

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;

use tally_core::UserName;
use tally_infra::{BudgetTracker, SqliteTransactionStore, TrackerConfig};
use tally_observability::LogSession;

use tally_cli::prompt::{self, Prompt, Session};
use tally_cli::{Cli, Command, report, sample};

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the environment and flags still apply.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = TrackerConfig::from_env().context("failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("invalid configuration")?;

    let log_path = config.log_path();
    let _log = LogSession::open(&log_path, &config.log_level)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut prompt = Prompt::new(stdin.lock(), stdout.lock());

    let user = match &cli.user {
        Some(raw) => UserName::parse(raw).context("invalid --user")?,
        None => match prompt::ask_user_name(&mut prompt)? {
            Some(user) => user,
            None => return Ok(()),
        },
    };

    let store = SqliteTransactionStore::open(config.data_dir(), &user).with_context(|| {
        format!(
            "failed to open the budget database for '{user}' in {}",
            config.data_dir().display()
        )
    })?;
    let mut tracker = BudgetTracker::from_config(user, store, &config)
        .context("failed to load stored transactions")?;

    match cli.selected_command() {
        Command::Interactive => {
            Session::new(&mut tracker, prompt).run()?;
        }
        Command::Sample => {
            sample::add_sample_data(&mut tracker).context("failed to record sample data")?;
            prompt.say("\n--- Automated Budget Summary ---")?;
            prompt.say(tracker.summarize())?;
        }
        Command::Summary { json } => {
            let mut out = prompt.into_output();
            report::write_summary(&mut out, &tracker.summarize(), json)
                .context("failed to write summary")?;
            out.flush()?;
        }
        Command::History => {
            let history = tracker.history().context("failed to read history")?;
            let mut out = prompt.into_output();
            report::write_history(&mut out, &history)?;
            out.flush()?;
        }
    }

    Ok(())
}
