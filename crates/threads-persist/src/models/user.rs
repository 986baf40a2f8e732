use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use super::PostKind;

/// Database-agnostic user model
///
/// `id` is the record id every reference points at; `account_id` is the
/// identifier issued by the external auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub onboarded: bool,
    pub created_at: DateTime<Utc>,
    pub threads: Vec<String>,
    pub repost: Vec<String>,
    pub questions: Vec<String>,
    pub repost_question: Vec<String>,
    pub communities: Vec<String>,
    pub followers: Vec<String>,
    pub followings: Vec<String>,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        account_id: impl Into<String>,
        name: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            account_id: account_id.into(),
            name: name.into(),
            username: username.into(),
            bio: None,
            image: None,
            onboarded: false,
            created_at: Utc::now(),
            threads: Vec::new(),
            repost: Vec::new(),
            questions: Vec::new(),
            repost_question: Vec::new(),
            communities: Vec::new(),
            followers: Vec::new(),
            followings: Vec::new(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Posts of `kind` this user wrote
    pub fn authored(&self, kind: PostKind) -> &[String] {
        match kind {
            PostKind::Thread => &self.threads,
            PostKind::Question => &self.questions,
        }
    }

    /// Posts of `kind` this user reposted
    pub fn reposted(&self, kind: PostKind) -> &[String] {
        match kind {
            PostKind::Thread => &self.repost,
            PostKind::Question => &self.repost_question,
        }
    }

    pub fn is_following(&self, user_id: &str) -> bool {
        self.followings.iter().any(|id| id == user_id)
    }

    pub fn is_followed_by(&self, user_id: &str) -> bool {
        self.followers.iter().any(|id| id == user_id)
    }
}
