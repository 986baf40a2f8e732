use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use super::PostKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub username: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub members: Vec<String>,
    pub threads: Vec<String>,
    pub questions: Vec<String>,
}

impl Community {
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
            description: None,
            image: None,
            created_at: Utc::now(),
            members: Vec::new(),
            threads: Vec::new(),
            questions: Vec::new(),
        }
    }

    pub fn posts(&self, kind: PostKind) -> &[String] {
        match kind {
            PostKind::Thread => &self.threads,
            PostKind::Question => &self.questions,
        }
    }
}
