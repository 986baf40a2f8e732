use std::sync::Arc;

use serde::Serialize;
use threads_persist::{Community, DocumentStore, Populator, ProfileUpdate, User, UserKey};

use crate::error::{FeedError, Result, StoreContext};
use crate::views::ProfileUser;

/// A user with their communities resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: ProfileUser,
    pub communities: Vec<Community>,
}

pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn fetch_user(&self, key: &UserKey) -> Result<UserProfile> {
        const CONTEXT: &str = "Failed to fetch user";

        let user = self.store
            .find_user(key)
            .await
            .store_context(CONTEXT)?
            .ok_or_else(|| FeedError::NotFound(format!("User {}", key)))?;

        let communities = Populator::new(self.store.as_ref())
            .communities(&user.communities)
            .await
            .store_context(CONTEXT)?;

        Ok(UserProfile {
            user: ProfileUser::from(user),
            communities,
        })
    }

    /// Create or update the profile for an account and mark it onboarded.
    /// Usernames are stored lowercase.
    pub async fn update_user(&self, update: ProfileUpdate) -> Result<User> {
        if update.username.trim().is_empty() {
            return Err(FeedError::Validation("username must not be empty".to_string()));
        }
        if update.name.trim().is_empty() {
            return Err(FeedError::Validation("name must not be empty".to_string()));
        }

        let update = ProfileUpdate {
            username: update.username.trim().to_lowercase(),
            ..update
        };

        let user = self.store
            .upsert_profile(&update)
            .await
            .store_context("Failed to create/update user")?;

        tracing::info!(account = %user.account_id, user = %user.id, "Profile updated");
        Ok(user)
    }
}
