//! Configuration loading and representation.
//!
//! Layering, lowest to highest precedence:
//!
//! 1. built-in defaults
//! 2. process environment (`TALLY_*`; the binary loads a `.env` file first)
//! 3. command-line flags (applied by the binary onto the loaded value)
//!
//! Call [`TrackerConfig::validate`] after the last layer is applied.

use core::str::FromStr;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use thiserror::Error;

pub const ENV_INITIAL_INCOME: &str = "TALLY_INITIAL_INCOME";
pub const ENV_DATA_DIR: &str = "TALLY_DATA_DIR";
pub const ENV_LOG_FILE: &str = "TALLY_LOG_FILE";
pub const ENV_LOG_LEVEL: &str = "TALLY_LOG_LEVEL";
pub const ENV_SEED_POLICY: &str = "TALLY_SEED_POLICY";

/// Log file name used when none is configured (placed in the data dir).
pub const DEFAULT_LOG_FILE: &str = "budget_tracker.log";

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// How the configured initial income combines with stored history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// Add the initial income on every start, on top of stored income.
    #[default]
    EveryStart,
    /// Record the initial income once, as a stored income transaction, when the
    /// store is still empty. Later starts rely on the stored record only.
    FirstRun,
}

impl SeedPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedPolicy::EveryStart => "every-start",
            SeedPolicy::FirstRun => "first-run",
        }
    }
}

impl core::fmt::Display for SeedPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeedPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "every-start" => Ok(SeedPolicy::EveryStart),
            "first-run" => Ok(SeedPolicy::FirstRun),
            other => Err(ConfigError::invalid(
                ENV_SEED_POLICY,
                format!("expected 'every-start' or 'first-run', got '{other}'"),
            )),
        }
    }
}

/// Settings for one tracker process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub initial_income: Decimal,
    /// Directory holding the per-user databases.
    pub data_dir: PathBuf,
    /// Explicit log file; `None` means `{data_dir}/budget_tracker.log`.
    pub log_file: Option<PathBuf>,
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,
    pub seed_policy: SeedPolicy,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            initial_income: Decimal::ZERO,
            data_dir: default_data_dir(),
            log_file: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            seed_policy: SeedPolicy::default(),
        }
    }
}

impl TrackerConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for the `TALLY_*` keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = get(ENV_INITIAL_INCOME) {
            config.initial_income = parse_income(&raw)?;
        }
        if let Some(raw) = get(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(raw);
        }
        if let Some(raw) = get(ENV_LOG_FILE) {
            config.log_file = Some(PathBuf::from(raw));
        }
        if let Some(raw) = get(ENV_LOG_LEVEL) {
            config.log_level = raw.trim().to_string();
        }
        if let Some(raw) = get(ENV_SEED_POLICY) {
            config.seed_policy = raw.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Resolved log file location.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_LOG_FILE))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_income < Decimal::ZERO {
            return Err(ConfigError::invalid(
                ENV_INITIAL_INCOME,
                "initial income cannot be negative",
            ));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::invalid(ENV_LOG_LEVEL, "log level is empty"));
        }
        Ok(())
    }
}

fn parse_income(raw: &str) -> Result<Decimal, ConfigError> {
    Decimal::from_str(raw.trim())
        .map_err(|e| ConfigError::invalid(ENV_INITIAL_INCOME, format!("'{raw}': {e}")))
}

/// `{os data dir}/tally`, or the working directory when the OS reports none.
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|mut dir| {
            dir.push("tally");
            dir
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = TrackerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.initial_income, Decimal::ZERO);
        assert_eq!(config.seed_policy, SeedPolicy::EveryStart);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_path(), config.data_dir.join("budget_tracker.log"));
    }

    #[test]
    fn environment_values_are_applied() {
        let config = TrackerConfig::from_lookup(lookup_from(&[
            (ENV_INITIAL_INCOME, "1500.00"),
            (ENV_DATA_DIR, "/var/lib/tally"),
            (ENV_LOG_FILE, "/tmp/tally.log"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_SEED_POLICY, "first-run"),
        ]))
        .unwrap();

        assert_eq!(config.initial_income, dec!(1500.00));
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/tally"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/tally.log"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.seed_policy, SeedPolicy::FirstRun);
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config =
            TrackerConfig::from_lookup(lookup_from(&[(ENV_INITIAL_INCOME, "  ")])).unwrap();
        assert_eq!(config.initial_income, Decimal::ZERO);
    }

    #[test]
    fn non_numeric_initial_income_is_rejected() {
        let err = TrackerConfig::from_lookup(lookup_from(&[(ENV_INITIAL_INCOME, "lots")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_INITIAL_INCOME, .. }));
    }

    #[test]
    fn negative_initial_income_is_rejected() {
        let err = TrackerConfig::from_lookup(lookup_from(&[(ENV_INITIAL_INCOME, "-1")]))
            .unwrap_err();
        assert!(err.to_string().contains("cannot be negative"));
    }

    #[test]
    fn unknown_seed_policy_is_rejected() {
        assert!("sometimes".parse::<SeedPolicy>().is_err());
        assert_eq!("first-run".parse::<SeedPolicy>().unwrap(), SeedPolicy::FirstRun);
    }
}
