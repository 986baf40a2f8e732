use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use threads_feed::{FeedResult, FeedType, Page, ReconcileReport, SearchQuery, UserProfile};
use threads_persist::{ProfileUpdate, User, UserKey};

use crate::{
    error::{ApiError, ApiResult},
    routes::{FeedQuery, ListQuery},
    state::AppState,
};

/// Read by a second extractor next to [`ListQuery`]. `#[serde(flatten)]`
/// breaks the numeric query fields.
#[derive(Debug, Deserialize)]
pub struct ExcludeQuery {
    /// Account id to leave out of the results
    pub exclude: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FollowRequest {
    /// Record id of the acting user
    pub current_user_id: String,
}

/// Search users, optionally excluding the caller's account
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(list): Query<ListQuery>,
    Query(filter): Query<ExcludeQuery>,
) -> ApiResult<Json<Page<User>>> {
    let search: SearchQuery = list.into();

    let page = match filter.exclude {
        Some(account_id) => state.search.fetch_users(&account_id, &search).await?,
        None => state.search.search_users(&search).await?,
    };

    Ok(Json(page))
}

/// Profile by account id, with communities
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> ApiResult<Json<UserProfile>> {
    let profile = state.profiles.fetch_user(&UserKey::Account(account_id)).await?;
    Ok(Json(profile))
}

/// Create or update the profile of an account
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<User>> {
    let user = state
        .profiles
        .update_user(ProfileUpdate {
            account_id,
            username: req.username,
            name: req.name,
            bio: req.bio,
            image: req.image,
        })
        .await?;

    Ok(Json(user))
}

/// Profile tab content by account id
pub async fn user_feed(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<FeedResult>> {
    let feed_type: FeedType = query
        .feed_type
        .parse()
        .map_err(|e: threads_feed::FeedError| ApiError::BadRequest(e.to_string()))?;

    let feed = state
        .feeds
        .load_profile_feed(&UserKey::Account(account_id), feed_type)
        .await?;

    Ok(Json(feed))
}

/// Follow the user with record id `id`
pub async fn follow(
    State(state): State<Arc<AppState>>,
    Path(target_id): Path<String>,
    Json(req): Json<FollowRequest>,
) -> ApiResult<StatusCode> {
    state
        .relationships
        .follow_user(&req.current_user_id, &target_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Stop following the user with record id `id`
pub async fn unfollow(
    State(state): State<Arc<AppState>>,
    Path(target_id): Path<String>,
    Json(req): Json<FollowRequest>,
) -> ApiResult<StatusCode> {
    state
        .relationships
        .unfollow_user(&req.current_user_id, &target_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Repair one-sided follow edges for the user with record id `id`
pub async fn reconcile(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> ApiResult<Json<ReconcileReport>> {
    let report = state.relationships.reconcile(&user_id).await?;
    Ok(Json(report))
}
