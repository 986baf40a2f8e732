use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FeedError;
use crate::views::{MemberView, PostView};

/// Tab a feed is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedType {
    Threads,
    /// Questions, shown without attribution in the UI
    Anonymous,
    Members,
    Followers,
}

impl FromStr for FeedType {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "threads" => Ok(FeedType::Threads),
            "anonymous" | "questions" => Ok(FeedType::Anonymous),
            "members" => Ok(FeedType::Members),
            "followers" => Ok(FeedType::Followers),
            other => Err(FeedError::Validation(format!("Unknown feed type: {}", other))),
        }
    }
}

/// Feed content, chosen once from the requested [`FeedType`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "items", rename_all = "snake_case")]
pub enum FeedResult {
    Threads(Vec<PostView>),
    Questions(Vec<PostView>),
    Members(Vec<MemberView>),
    Empty,
}

impl FeedResult {
    pub fn len(&self) -> usize {
        match self {
            FeedResult::Threads(posts) | FeedResult::Questions(posts) => posts.len(),
            FeedResult::Members(members) => members.len(),
            FeedResult::Empty => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_type_parsing() {
        assert_eq!("Threads".parse::<FeedType>().unwrap(), FeedType::Threads);
        assert_eq!("anonymous".parse::<FeedType>().unwrap(), FeedType::Anonymous);
        assert_eq!("MEMBERS".parse::<FeedType>().unwrap(), FeedType::Members);
        assert!("replies".parse::<FeedType>().is_err());
    }

    #[test]
    fn test_empty_feed_serializes_with_tag_only() {
        let json = serde_json::to_value(FeedResult::Empty).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "empty" }));
        assert!(FeedResult::Empty.is_empty());
    }
}
