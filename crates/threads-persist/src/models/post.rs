use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Threads and questions share one document shape and live in separate
/// collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    Thread,
    Question,
}

impl PostKind {
    pub fn collection(&self) -> &'static str {
        match self {
            PostKind::Thread => "threads",
            PostKind::Question => "questions",
        }
    }
}

/// Database-agnostic post model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub kind: PostKind,
    pub text: String,
    pub author: String,
    pub parent_id: Option<String>,
    pub community: Option<String>,
    pub children: Vec<String>,
    pub photos: Vec<String>,
    pub likes: Vec<String>,
    pub repost: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(
        id: impl Into<String>,
        kind: PostKind,
        author: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            text: text.into(),
            author: author.into(),
            parent_id: None,
            community: None,
            children: Vec::new(),
            photos: Vec::new(),
            likes: Vec::new(),
            repost: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn in_community(mut self, community_id: impl Into<String>) -> Self {
        self.community = Some(community_id.into());
        self
    }

    pub fn reply_to(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}
