use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use threads_persist::{DocumentStore, Populator, User, UserKey};

use crate::error::{FeedError, Result, StoreContext};

/// Follow graph mutation.
///
/// Every operation reads both users and writes each side separately. There
/// is no transaction around the two writes: a failure between them, or two
/// concurrent writers on the same user, can leave an edge recorded on one
/// side only. [`RelationshipMutator::reconcile`] repairs such edges on
/// request, treating `followings` as the source of truth.
pub struct RelationshipMutator {
    store: Arc<dyn DocumentStore>,
}

/// What a reconcile pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Followed users that were missing this user in their `followers`
    pub back_references_added: usize,
    /// Entries dropped from this user's `followers`
    pub stale_followers_removed: usize,
    /// Entries dropped from this user's `followings` because the user is gone
    pub dangling_followings_removed: usize,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

impl RelationshipMutator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Record that `current_user_id` follows `target_id`. Both ids are record
    /// ids. Following twice changes nothing.
    pub async fn follow_user(&self, current_user_id: &str, target_id: &str) -> Result<()> {
        const CONTEXT: &str = "Failed to follow user";

        let (mut current, mut target) = self.load_pair(current_user_id, target_id, CONTEXT).await?;

        // followings is written first so an interrupted follow is repaired
        // forward by reconcile
        let following_added = add_ref(&mut current.followings, &target.id);
        if following_added {
            self.store.save_user(&current).await.store_context(CONTEXT)?;
        }
        let follower_added = add_ref(&mut target.followers, &current.id);
        if follower_added {
            self.store.save_user(&target).await.store_context(CONTEXT)?;
        }

        if following_added || follower_added {
            tracing::info!(follower = %current.id, followed = %target.id, "User followed");
        } else {
            tracing::debug!(follower = %current.id, followed = %target.id, "Already following");
        }
        Ok(())
    }

    /// Remove the follow edge. Unfollowing a user you do not follow changes
    /// nothing.
    pub async fn unfollow_user(&self, current_user_id: &str, target_id: &str) -> Result<()> {
        const CONTEXT: &str = "Failed to unfollow user";

        let (mut current, mut target) = self.load_pair(current_user_id, target_id, CONTEXT).await?;

        let following_removed = remove_ref(&mut current.followings, &target.id);
        if following_removed {
            self.store.save_user(&current).await.store_context(CONTEXT)?;
        }
        let follower_removed = remove_ref(&mut target.followers, &current.id);
        if follower_removed {
            self.store.save_user(&target).await.store_context(CONTEXT)?;
        }

        if following_removed || follower_removed {
            tracing::info!(follower = %current.id, unfollowed = %target.id, "User unfollowed");
        } else {
            tracing::debug!(follower = %current.id, unfollowed = %target.id, "Not following, nothing to remove");
        }
        Ok(())
    }

    pub async fn is_following(&self, current_user_id: &str, target_id: &str) -> Result<bool> {
        let current = self
            .load(current_user_id, "Failed to check follow state", "Current user")
            .await?;
        Ok(current.is_following(target_id))
    }

    /// Bring both sides of every edge touching `user_id` back in line.
    ///
    /// Followed users get the missing back-reference, followers that no
    /// longer follow this user are dropped, and followings pointing at
    /// deleted users are dropped.
    pub async fn reconcile(&self, user_id: &str) -> Result<ReconcileReport> {
        const CONTEXT: &str = "Failed to reconcile follow graph";

        let mut user = self.load(user_id, CONTEXT, "User").await?;
        let populator = Populator::new(self.store.as_ref());
        let mut report = ReconcileReport::default();

        let followed = populator.users(&user.followings).await.store_context(CONTEXT)?;
        for mut other in followed.iter().cloned() {
            if add_ref(&mut other.followers, &user.id) {
                tracing::warn!(user = %user.id, followed = %other.id, "Restoring missing follower reference");
                self.store.save_user(&other).await.store_context(CONTEXT)?;
                report.back_references_added += 1;
            }
        }

        let existing: HashSet<&str> = followed.iter().map(|u| u.id.as_str()).collect();
        let before = user.followings.len();
        user.followings.retain(|id| existing.contains(id.as_str()));
        report.dangling_followings_removed = before - user.followings.len();

        let followers = populator.users(&user.followers).await.store_context(CONTEXT)?;
        let confirmed: HashSet<&str> = followers
            .iter()
            .filter(|f| f.is_following(&user.id))
            .map(|f| f.id.as_str())
            .collect();
        let before = user.followers.len();
        user.followers.retain(|id| confirmed.contains(id.as_str()));
        report.stale_followers_removed = before - user.followers.len();

        if report.stale_followers_removed > 0 || report.dangling_followings_removed > 0 {
            tracing::warn!(
                user = %user.id,
                stale_followers = report.stale_followers_removed,
                dangling_followings = report.dangling_followings_removed,
                "Dropping one-sided follow references"
            );
            self.store.save_user(&user).await.store_context(CONTEXT)?;
        }

        Ok(report)
    }

    async fn load(&self, id: &str, context: &str, role: &str) -> Result<User> {
        self.store
            .find_user(&UserKey::record(id))
            .await
            .store_context(context)?
            .ok_or_else(|| FeedError::NotFound(format!("{} {}", role, id)))
    }

    async fn load_pair(&self, current_user_id: &str, target_id: &str, context: &str) -> Result<(User, User)> {
        if current_user_id == target_id {
            return Err(FeedError::Validation(format!("{}: users cannot follow themselves", context)));
        }
        let target = self.load(target_id, context, "Target user").await?;
        let current = self.load(current_user_id, context, "Current user").await?;
        Ok((current, target))
    }
}

fn add_ref(refs: &mut Vec<String>, id: &str) -> bool {
    if refs.iter().any(|r| r == id) {
        return false;
    }
    refs.push(id.to_string());
    true
}

fn remove_ref(refs: &mut Vec<String>, id: &str) -> bool {
    let before = refs.len();
    refs.retain(|r| r != id);
    refs.len() != before
}
