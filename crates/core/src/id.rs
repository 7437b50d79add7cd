//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Longest user name accepted (it becomes part of a file name).
const MAX_USER_NAME_LEN: usize = 64;

/// Identifier of a stored transaction.
///
/// Assigned by the store on append; unique and monotonically increasing within
/// one user's history.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(i64);

impl TransactionId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Name of the person whose budget is tracked.
///
/// The name keys the per-user database file, so it is restricted to
/// characters that are safe inside a file name on every platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(DomainError::invalid_id("user name must not be empty"));
        }
        if name.chars().count() > MAX_USER_NAME_LEN {
            return Err(DomainError::invalid_id(format!(
                "user name must be at most {MAX_USER_NAME_LEN} characters"
            )));
        }
        if name.starts_with('.') {
            return Err(DomainError::invalid_id("user name must not start with '.'"));
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.')))
        {
            return Err(DomainError::invalid_id(format!(
                "user name contains unsupported character {bad:?}"
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for UserName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UserName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_name_is_trimmed() {
        let name = UserName::parse("  alice ").unwrap();
        assert_eq!(name.as_str(), "alice");
    }

    #[test]
    fn user_name_allows_spaces_and_dashes() {
        assert!(UserName::parse("Mary-Jane Doe_2").is_ok());
    }

    #[test]
    fn empty_user_name_is_rejected() {
        assert!(matches!(UserName::parse("   "), Err(DomainError::InvalidId(_))));
    }

    #[test]
    fn path_like_user_names_are_rejected() {
        for raw in ["../etc", "a/b", "a\\b", ".hidden"] {
            assert!(UserName::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn overlong_user_name_is_rejected() {
        let raw = "x".repeat(MAX_USER_NAME_LEN + 1);
        assert!(UserName::parse(&raw).is_err());
    }
}
