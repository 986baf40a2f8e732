use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Community, Post, PostKind, User};
use crate::query::{CommunityFilter, FindOptions, ProfileUpdate, UserFilter, UserKey};

/// Trait for document store operations
///
/// Implementations provide backend-specific access to the users, threads,
/// questions and communities collections. Lookups by a list of ids return the
/// documents that exist, in no particular order; callers that care about order
/// go through [`crate::Populator`].
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Find a user by account id or record id
    async fn find_user(&self, key: &UserKey) -> Result<Option<User>>;

    /// Find every user whose record id is in `ids`
    async fn find_users_by_ids(&self, ids: &[String]) -> Result<Vec<User>>;

    /// Filtered, sorted and paged user listing
    async fn find_users(&self, filter: &UserFilter, options: &FindOptions) -> Result<Vec<User>>;

    /// Count users matching `filter`, ignoring paging
    async fn count_users(&self, filter: &UserFilter) -> Result<u64>;

    /// Replace the stored user with this one, inserting it if missing
    async fn save_user(&self, user: &User) -> Result<()>;

    /// Upsert profile fields by account id and mark the user onboarded
    async fn upsert_profile(&self, update: &ProfileUpdate) -> Result<User>;

    async fn find_posts_by_ids(&self, kind: PostKind, ids: &[String]) -> Result<Vec<Post>>;

    /// Replace the stored post with this one, inserting it if missing
    async fn save_post(&self, post: &Post) -> Result<()>;

    /// Find a community by record id
    async fn find_community(&self, id: &str) -> Result<Option<Community>>;

    async fn find_communities_by_ids(&self, ids: &[String]) -> Result<Vec<Community>>;

    async fn find_communities(
        &self,
        filter: &CommunityFilter,
        options: &FindOptions,
    ) -> Result<Vec<Community>>;

    async fn count_communities(&self, filter: &CommunityFilter) -> Result<u64>;

    /// Replace the stored community with this one, inserting it if missing
    async fn save_community(&self, community: &Community) -> Result<()>;

    /// Cheap reachability check for health probes
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    /// Release the connection. The store must not be used afterwards.
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
