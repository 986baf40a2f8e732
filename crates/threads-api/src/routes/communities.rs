use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use threads_feed::{FeedResult, FeedType, Page};
use threads_persist::Community;

use crate::{
    error::{ApiError, ApiResult},
    routes::{FeedQuery, ListQuery},
    state::AppState,
};

/// Search communities by name or username
pub async fn list_communities(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Page<Community>>> {
    let page = state.search.search_communities(&query.into()).await?;
    Ok(Json(page))
}

/// Community tab content: threads, questions or members
pub async fn community_feed(
    State(state): State<Arc<AppState>>,
    Path(community_id): Path<String>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<FeedResult>> {
    let feed_type: FeedType = query
        .feed_type
        .parse()
        .map_err(|e: threads_feed::FeedError| ApiError::BadRequest(e.to_string()))?;

    let feed = state.feeds.load_community_feed(&community_id, feed_type).await?;
    Ok(Json(feed))
}
