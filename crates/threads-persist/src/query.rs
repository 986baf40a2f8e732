use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{PersistError, Result};

/// How a caller addresses a user record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserKey {
    /// External auth provider id (`id` in the users collection)
    Account(String),
    /// Record id (`_id` in the users collection)
    Record(String),
}

impl UserKey {
    pub fn account(id: impl Into<String>) -> Self {
        Self::Account(id.into())
    }

    pub fn record(id: impl Into<String>) -> Self {
        Self::Record(id.into())
    }
}

impl fmt::Display for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserKey::Account(id) => write!(f, "account {}", id),
            UserKey::Record(id) => write!(f, "record {}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Direction value as understood by MongoDB sort documents
    pub fn direction(&self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

impl FromStr for SortOrder {
    type Err = PersistError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "1" => Ok(SortOrder::Asc),
            "desc" | "descending" | "-1" => Ok(SortOrder::Desc),
            other => Err(PersistError::Internal(format!("Unknown sort order: {}", other))),
        }
    }
}

/// Case-insensitive substring match over one or more text fields.
///
/// The search term is escaped, so regex metacharacters typed by a user match
/// literally.
#[derive(Debug, Clone)]
pub struct TextFilter {
    pattern: String,
    regex: Regex,
}

impl TextFilter {
    /// Returns `None` for blank input, which means "match everything".
    pub fn new(search: &str) -> Option<Self> {
        if search.trim().is_empty() {
            return None;
        }

        let pattern = regex::escape(search);
        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .ok()?;

        Some(Self { pattern, regex })
    }

    /// Escaped pattern, suitable for a `$regex` clause with the `i` option
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches_any(&self, fields: &[&str]) -> bool {
        fields.iter().any(|field| self.regex.is_match(field))
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Matched against `username` or `name`
    pub text: Option<TextFilter>,
    /// Account id left out of the results
    pub exclude_account: Option<String>,
}

impl UserFilter {
    pub fn matches(&self, username: &str, name: &str, account_id: &str) -> bool {
        if self.exclude_account.as_deref() == Some(account_id) {
            return false;
        }
        match &self.text {
            Some(text) => text.matches_any(&[username, name]),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommunityFilter {
    /// Matched against `username` or `name`
    pub text: Option<TextFilter>,
}

impl CommunityFilter {
    pub fn matches(&self, username: &str, name: &str) -> bool {
        match &self.text {
            Some(text) => text.matches_any(&[username, name]),
            None => true,
        }
    }
}

/// Sort, skip and limit applied to a filtered listing. Sorting is always on
/// `createdAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindOptions {
    pub sort: SortOrder,
    pub skip: u64,
    pub limit: i64,
}

impl Default for FindOptions {
    fn default() -> Self {
        Self {
            sort: SortOrder::Desc,
            skip: 0,
            limit: 20,
        }
    }
}

/// Fields written by a profile upsert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub account_id: String,
    pub username: String,
    pub name: String,
    pub bio: Option<String>,
    pub image: Option<String>,
}
