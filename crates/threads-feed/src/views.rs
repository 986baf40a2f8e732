use chrono::{DateTime, Utc};
use serde::Serialize;
use threads_persist::{AuthorRef, CommunityRef, PopulatedPost, PostKind, User};

/// Flat view of one feed entry, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostView {
    pub id: String,
    pub kind: PostKind,
    pub parent_id: Option<String>,
    pub author: Option<AuthorRef>,
    pub community: Option<CommunityRef>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub reply_count: usize,
    pub replies: Vec<ReplyView>,
    pub likes: Vec<String>,
    pub repost_count: usize,
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyView {
    pub id: String,
    pub author: Option<AuthorRef>,
}

impl From<PopulatedPost> for PostView {
    fn from(populated: PopulatedPost) -> Self {
        let post = populated.post;
        let replies: Vec<ReplyView> = populated
            .children
            .into_iter()
            .map(|child| ReplyView {
                id: child.post.id,
                author: child.author,
            })
            .collect();

        Self {
            id: post.id,
            kind: post.kind,
            parent_id: post.parent_id,
            author: populated.author,
            community: populated.community,
            content: post.text,
            created_at: post.created_at,
            reply_count: replies.len(),
            replies,
            likes: post.likes,
            repost_count: post.repost.len(),
            photos: post.photos,
        }
    }
}

/// Community member as shown in a members tab
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberView {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub username: String,
    pub image: Option<String>,
}

impl From<User> for MemberView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            account_id: user.account_id,
            name: user.name,
            username: user.username,
            image: user.image,
        }
    }
}

/// Profile fields of a user. Reference lists other than the follow graph
/// are left out; communities are served resolved next to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileUser {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub onboarded: bool,
    pub created_at: DateTime<Utc>,
    pub followers: Vec<String>,
    pub followings: Vec<String>,
}

impl From<User> for ProfileUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            account_id: user.account_id,
            name: user.name,
            username: user.username,
            bio: user.bio,
            image: user.image,
            onboarded: user.onboarded,
            created_at: user.created_at,
            followers: user.followers,
            followings: user.followings,
        }
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_more: bool,
}
