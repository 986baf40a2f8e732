use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Community, Post, PostKind, User};
use crate::query::{CommunityFilter, FindOptions, ProfileUpdate, SortOrder, UserFilter, UserKey};
use crate::trait_client::DocumentStore;

/// Process-local store backed by vectors behind async locks.
///
/// Documents keep insertion order, so listings with equal `created_at` come
/// back in the order they were first saved. Used by the test suites and for
/// running the API without a database.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    threads: RwLock<Vec<Post>>,
    questions: RwLock<Vec<Post>>,
    communities: RwLock<Vec<Community>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh record id for documents created by this store
    pub fn new_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn posts(&self, kind: PostKind) -> &RwLock<Vec<Post>> {
        match kind {
            PostKind::Thread => &self.threads,
            PostKind::Question => &self.questions,
        }
    }
}

fn page<T: Clone>(
    mut items: Vec<T>,
    options: &FindOptions,
    created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>,
) -> Vec<T> {
    // sort_by is stable, so ties keep insertion order in both directions
    match options.sort {
        SortOrder::Asc => items.sort_by(|a, b| created_at(a).cmp(&created_at(b))),
        SortOrder::Desc => items.sort_by(|a, b| created_at(b).cmp(&created_at(a))),
    }

    let limit = if options.limit > 0 {
        options.limit as usize
    } else {
        usize::MAX
    };

    items
        .into_iter()
        .skip(options.skip as usize)
        .take(limit)
        .collect()
}

fn upsert_by_id<T: Clone>(items: &mut Vec<T>, item: &T, id: impl Fn(&T) -> &str) {
    match items.iter_mut().find(|existing| id(existing) == id(item)) {
        Some(existing) => *existing = item.clone(),
        None => items.push(item.clone()),
    }
}

fn select_by_ids<T: Clone>(items: &[T], ids: &[String], id: impl Fn(&T) -> &str) -> Vec<T> {
    let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
    items
        .iter()
        .filter(|item| wanted.contains(id(item)))
        .cloned()
        .collect()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_user(&self, key: &UserKey) -> Result<Option<User>> {
        let users = self.users.read().await;
        let user = users.iter().find(|u| match key {
            UserKey::Account(id) => &u.account_id == id,
            UserKey::Record(id) => &u.id == id,
        });
        Ok(user.cloned())
    }

    async fn find_users_by_ids(&self, ids: &[String]) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(select_by_ids(&users, ids, |u| u.id.as_str()))
    }

    async fn find_users(&self, filter: &UserFilter, options: &FindOptions) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let matching: Vec<User> = users
            .iter()
            .filter(|u| filter.matches(&u.username, &u.name, &u.account_id))
            .cloned()
            .collect();
        Ok(page(matching, options, |u| u.created_at))
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<u64> {
        let users = self.users.read().await;
        let count = users
            .iter()
            .filter(|u| filter.matches(&u.username, &u.name, &u.account_id))
            .count();
        Ok(count as u64)
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        upsert_by_id(&mut users, user, |u| u.id.as_str());
        Ok(())
    }

    async fn upsert_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let mut users = self.users.write().await;

        let index = match users.iter().position(|u| u.account_id == update.account_id) {
            Some(index) => index,
            None => {
                users.push(User::new(
                    Self::new_id(),
                    update.account_id.clone(),
                    update.name.clone(),
                    update.username.clone(),
                ));
                users.len() - 1
            }
        };

        let user = &mut users[index];
        user.username = update.username.clone();
        user.name = update.name.clone();
        user.bio = update.bio.clone();
        user.image = update.image.clone();
        user.onboarded = true;

        Ok(user.clone())
    }

    async fn find_posts_by_ids(&self, kind: PostKind, ids: &[String]) -> Result<Vec<Post>> {
        let posts = self.posts(kind).read().await;
        Ok(select_by_ids(&posts, ids, |p| p.id.as_str()))
    }

    async fn save_post(&self, post: &Post) -> Result<()> {
        let mut posts = self.posts(post.kind).write().await;
        upsert_by_id(&mut posts, post, |p| p.id.as_str());
        Ok(())
    }

    async fn find_community(&self, id: &str) -> Result<Option<Community>> {
        let communities = self.communities.read().await;
        Ok(communities.iter().find(|c| c.id == id).cloned())
    }

    async fn find_communities_by_ids(&self, ids: &[String]) -> Result<Vec<Community>> {
        let communities = self.communities.read().await;
        Ok(select_by_ids(&communities, ids, |c| c.id.as_str()))
    }

    async fn find_communities(
        &self,
        filter: &CommunityFilter,
        options: &FindOptions,
    ) -> Result<Vec<Community>> {
        let communities = self.communities.read().await;
        let matching: Vec<Community> = communities
            .iter()
            .filter(|c| filter.matches(&c.username, &c.name))
            .cloned()
            .collect();
        Ok(page(matching, options, |c| c.created_at))
    }

    async fn count_communities(&self, filter: &CommunityFilter) -> Result<u64> {
        let communities = self.communities.read().await;
        let count = communities
            .iter()
            .filter(|c| filter.matches(&c.username, &c.name))
            .count();
        Ok(count as u64)
    }

    async fn save_community(&self, community: &Community) -> Result<()> {
        let mut communities = self.communities.write().await;
        upsert_by_id(&mut communities, community, |c| c.id.as_str());
        Ok(())
    }
}
