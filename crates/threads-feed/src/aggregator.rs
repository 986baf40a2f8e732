use std::sync::Arc;

use threads_persist::{DocumentStore, PopulatedPost, Populator, PostKind, UserKey};

use crate::error::{FeedError, Result, StoreContext};
use crate::feed::{FeedResult, FeedType};
use crate::views::{MemberView, PostView};

/// Builds feed views from users, posts and communities
pub struct FeedAggregator {
    store: Arc<dyn DocumentStore>,
}

impl FeedAggregator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The account's threads and reposted threads, newest first
    pub async fn fetch_user_posts(&self, key: &UserKey) -> Result<Vec<PostView>> {
        self.user_feed(key, PostKind::Thread, "Failed to fetch user posts").await
    }

    /// The account's questions and reposted questions, newest first
    pub async fn fetch_user_questions(&self, key: &UserKey) -> Result<Vec<PostView>> {
        self.user_feed(key, PostKind::Question, "Failed to fetch user questions").await
    }

    /// Posts of `kind` published in a community, newest first
    pub async fn fetch_community_posts(
        &self,
        community_id: &str,
        kind: PostKind,
    ) -> Result<Vec<PostView>> {
        const CONTEXT: &str = "Failed to fetch community posts";

        let community = self.store
            .find_community(community_id)
            .await
            .store_context(CONTEXT)?
            .ok_or_else(|| FeedError::NotFound(format!("Community {}", community_id)))?;

        let posts = Populator::new(self.store.as_ref())
            .posts(kind, community.posts(kind))
            .await
            .store_context(CONTEXT)?;

        Ok(newest_first(posts))
    }

    /// Members of a community in membership order
    pub async fn fetch_community_members(&self, community_id: &str) -> Result<Vec<MemberView>> {
        const CONTEXT: &str = "Failed to fetch community members";

        let community = self.store
            .find_community(community_id)
            .await
            .store_context(CONTEXT)?
            .ok_or_else(|| FeedError::NotFound(format!("Community {}", community_id)))?;

        let members = Populator::new(self.store.as_ref())
            .users(&community.members)
            .await
            .store_context(CONTEXT)?;

        Ok(members.into_iter().map(MemberView::from).collect())
    }

    /// Profile tab content. Profiles have no members tab and the followers
    /// tab is rendered elsewhere, so both come back empty.
    pub async fn load_profile_feed(&self, key: &UserKey, feed: FeedType) -> Result<FeedResult> {
        let result = match feed {
            FeedType::Threads => FeedResult::Threads(self.fetch_user_posts(key).await?),
            FeedType::Anonymous => FeedResult::Questions(self.fetch_user_questions(key).await?),
            FeedType::Members | FeedType::Followers => FeedResult::Empty,
        };
        Ok(result)
    }

    pub async fn load_community_feed(
        &self,
        community_id: &str,
        feed: FeedType,
    ) -> Result<FeedResult> {
        let result = match feed {
            FeedType::Threads => FeedResult::Threads(
                self.fetch_community_posts(community_id, PostKind::Thread).await?,
            ),
            FeedType::Anonymous => FeedResult::Questions(
                self.fetch_community_posts(community_id, PostKind::Question).await?,
            ),
            FeedType::Members => {
                FeedResult::Members(self.fetch_community_members(community_id).await?)
            }
            FeedType::Followers => FeedResult::Empty,
        };
        Ok(result)
    }

    async fn user_feed(&self, key: &UserKey, kind: PostKind, context: &str) -> Result<Vec<PostView>> {
        let user = self.store
            .find_user(key)
            .await
            .store_context(context)?
            .ok_or_else(|| FeedError::NotFound(format!("User {}", key)))?;

        let populator = Populator::new(self.store.as_ref());
        let mut posts = populator
            .posts(kind, user.authored(kind))
            .await
            .store_context(context)?;
        posts.extend(
            populator
                .posts(kind, user.reposted(kind))
                .await
                .store_context(context)?,
        );

        tracing::debug!(user = %user.id, kind = ?kind, posts = posts.len(), "Aggregated user feed");

        Ok(newest_first(posts))
    }
}

/// Sort by `created_at` descending. The sort is stable, so posts with equal
/// timestamps keep their incoming order.
fn newest_first(posts: Vec<PopulatedPost>) -> Vec<PostView> {
    let mut views: Vec<PostView> = posts.into_iter().map(PostView::from).collect();
    views.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    views
}
