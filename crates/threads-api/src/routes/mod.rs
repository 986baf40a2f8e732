pub mod communities;
pub mod health;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use threads_feed::SearchQuery;
use threads_persist::SortOrder;

use crate::{config::Config, middleware::logging, state::AppState};

/// Build the application router with middleware
pub fn router(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Users
        .route("/users", get(users::list_users))
        .route("/users/:id", get(users::get_user).put(users::update_user))
        .route("/users/:id/feed", get(users::user_feed))
        .route("/users/:id/follow", post(users::follow).delete(users::unfollow))
        .route("/users/:id/reconcile", post(users::reconcile))
        // Communities
        .route("/communities", get(communities::list_communities))
        .route("/communities/:id/feed", get(communities::community_feed))
        .layer(middleware::from_fn(logging::log_request))
        .layer(TimeoutLayer::new(timeout))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors.enabled {
        let cors = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers(Any);

        if config.cors.origins.iter().any(|o| o == "*") {
            cors.allow_origin(Any)
        } else {
            let parsed_origins: Vec<axum::http::HeaderValue> = config.cors.origins
                .iter()
                .filter_map(|o| o.parse::<axum::http::HeaderValue>().ok())
                .collect();

            cors.allow_origin(parsed_origins)
        }
    } else {
        CorsLayer::permissive()
    }
}

/// Query string shared by the listing endpoints
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    #[serde(default)]
    pub sort: SortOrder,
}

impl From<ListQuery> for SearchQuery {
    fn from(query: ListQuery) -> Self {
        Self {
            search_string: query.q,
            page_number: query.page,
            page_size: query.page_size,
            sort_by: query.sort,
        }
    }
}

/// `?type=` selector for feed endpoints
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(rename = "type", default = "default_feed_type")]
    pub feed_type: String,
}

fn default_feed_type() -> String {
    "threads".to_string()
}
