use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    response::IntoResponse,
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use threads_api::{config::Config, error::ApiError, routes, state::AppState};
use threads_feed::FeedError;
use threads_persist::{
    Community, CommunityFilter, DocumentStore, FindOptions, MemoryStore, PersistError, Post,
    PostKind, ProfileUpdate, User, UserFilter, UserKey,
};

const CONFIG: &str = r#"
    [server]
    host = "127.0.0.1"
    port = 0

    [cors]
    enabled = false
    origins = []

    [store]
    backend = "memory"

    [mongodb]
    database = "test"
    pool_size = 1
    timeout_ms = 100

    [logging]
    level = "debug"
    format = "pretty"
"#;

async fn app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let base = Utc::now();

    let mut alice = User::new("alice", "acct_alice", "Alice", "alice").with_created_at(base);
    alice.threads = vec!["t1".to_string()];
    let bob = User::new("bob", "acct_bob", "Bob", "bob").with_created_at(base + Duration::seconds(1));
    store.save_user(&alice).await.unwrap();
    store.save_user(&bob).await.unwrap();
    store
        .save_post(&Post::new("t1", PostKind::Thread, "alice", "hello"))
        .await
        .unwrap();

    let config: Config = toml::from_str(CONFIG).unwrap();
    let state = Arc::new(AppState::new(config, store.clone()));
    (routes::router(state), store)
}

/// Store that fails its ping and refuses full collection scans
struct UnreachableStore;

#[async_trait]
impl DocumentStore for UnreachableStore {
    async fn find_user(&self, _: &UserKey) -> threads_persist::Result<Option<User>> {
        Ok(None)
    }

    async fn find_users_by_ids(&self, _: &[String]) -> threads_persist::Result<Vec<User>> {
        Ok(Vec::new())
    }

    async fn find_users(&self, _: &UserFilter, _: &FindOptions) -> threads_persist::Result<Vec<User>> {
        panic!("health check must not list users")
    }

    async fn count_users(&self, _: &UserFilter) -> threads_persist::Result<u64> {
        panic!("health check must not count users")
    }

    async fn save_user(&self, _: &User) -> threads_persist::Result<()> {
        Ok(())
    }

    async fn upsert_profile(&self, update: &ProfileUpdate) -> threads_persist::Result<User> {
        Ok(User::new("u", update.account_id.clone(), update.name.clone(), update.username.clone()))
    }

    async fn find_posts_by_ids(&self, _: PostKind, _: &[String]) -> threads_persist::Result<Vec<Post>> {
        Ok(Vec::new())
    }

    async fn save_post(&self, _: &Post) -> threads_persist::Result<()> {
        Ok(())
    }

    async fn find_community(&self, _: &str) -> threads_persist::Result<Option<Community>> {
        Ok(None)
    }

    async fn find_communities_by_ids(&self, _: &[String]) -> threads_persist::Result<Vec<Community>> {
        Ok(Vec::new())
    }

    async fn find_communities(
        &self,
        _: &CommunityFilter,
        _: &FindOptions,
    ) -> threads_persist::Result<Vec<Community>> {
        Ok(Vec::new())
    }

    async fn count_communities(&self, _: &CommunityFilter) -> threads_persist::Result<u64> {
        Ok(0)
    }

    async fn save_community(&self, _: &Community) -> threads_persist::Result<()> {
        Ok(())
    }

    async fn ping(&self) -> threads_persist::Result<()> {
        Err(PersistError::Connection("no route to host".to_string()))
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_reports_store() {
    let (app, _) = app().await;
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["store"], "connected");
}

#[tokio::test]
async fn test_health_uses_ping_and_reports_degraded() {
    let config: Config = toml::from_str(CONFIG).unwrap();
    let app = routes::router(Arc::new(AppState::new(config, Arc::new(UnreachableStore))));

    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["store"], "disconnected");
}

#[tokio::test]
async fn test_list_users_sorts_and_excludes() {
    let (app, _) = app().await;

    let (status, body) = send(&app, get("/users?sort=asc")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"][0]["name"], "Alice");
    assert_eq!(body["items"][1]["name"], "Bob");
    assert_eq!(body["has_more"], false);

    let (_, body) = send(&app, get("/users?exclude=acct_alice")).await;
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Bob");

    let (_, body) = send(&app, get("/users?page_size=1")).await;
    assert_eq!(body["items"][0]["name"], "Bob");
    assert_eq!(body["has_more"], true);

    let (status, body) = send(&app, get("/users?q=B&page=1&page_size=1&sort=asc&exclude=acct_alice")).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Bob");
    assert_eq!(body["has_more"], false);
}

#[tokio::test]
async fn test_user_feed_returns_tagged_result() {
    let (app, _) = app().await;

    let (status, body) = send(&app, get("/users/acct_alice/feed?type=Threads")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "threads");
    assert_eq!(body["items"][0]["content"], "hello");
    assert_eq!(body["items"][0]["author"]["name"], "Alice");

    let (status, _) = send(&app, get("/users/acct_ghost/feed")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/users/acct_alice/feed?type=bogus")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_follow_and_unfollow_round_trip() {
    let (app, store) = app().await;
    let body = json!({ "current_user_id": "alice" });

    let (status, _) = send(&app, json_request("POST", "/users/bob/follow", body.clone())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let bob = store.find_user(&UserKey::record("bob")).await.unwrap().unwrap();
    assert_eq!(bob.followers, vec!["alice".to_string()]);

    let (status, _) = send(&app, json_request("DELETE", "/users/bob/follow", body)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let bob = store.find_user(&UserKey::record("bob")).await.unwrap().unwrap();
    assert!(bob.followers.is_empty());

    let (status, _) = send(
        &app,
        json_request("POST", "/users/ghost/follow", json!({ "current_user_id": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_profile_then_fetch() {
    let (app, _) = app().await;

    let (status, body) = send(
        &app,
        json_request("PUT", "/users/acct_new", json!({ "username": "NewOne", "name": "New" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "newone");
    assert_eq!(body["onboarded"], true);

    let (status, body) = send(&app, get("/users/acct_new")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "New");
    assert_eq!(body["communities"], json!([]));
}

#[tokio::test]
async fn test_profile_body_has_single_communities_key() {
    let (app, store) = app().await;
    let mut alice = store.find_user(&UserKey::record("alice")).await.unwrap().unwrap();
    alice.communities = vec!["c1".to_string()];
    store.save_user(&alice).await.unwrap();
    store
        .save_community(&Community::new("c1", "org_1", "Rustaceans", "rust"))
        .await
        .unwrap();

    let response = app.oneshot(get("/users/acct_alice")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let raw = String::from_utf8(bytes.to_vec()).unwrap();

    assert_eq!(raw.matches("\"communities\"").count(), 1);
    assert!(raw.contains("\"name\":\"Rustaceans\""));
}

#[tokio::test]
async fn test_api_error_response() {
    let error = ApiError::Feed(FeedError::Validation("bad page".to_string()));
    assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);

    let error = ApiError::Feed(FeedError::NotFound("User x".to_string()));
    assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
}
