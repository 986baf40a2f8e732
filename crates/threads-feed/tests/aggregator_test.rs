use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use threads_feed::{FeedAggregator, FeedError, FeedResult, FeedType};
use threads_persist::{Community, DocumentStore, MemoryStore, Post, PostKind, User, UserKey};

fn at(base: DateTime<Utc>, seconds: i64) -> DateTime<Utc> {
    base + Duration::seconds(seconds)
}

/// alice writes t1 (t+10) and t3 (t+30), reposts bob's t2 (t+20) and
/// t4 (t+10, same instant as t1). She also has one question q1.
async fn seed() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let base = Utc::now();

    let mut alice = User::new("alice", "acct_alice", "Alice", "alice");
    alice.threads = vec!["t1".to_string(), "t3".to_string()];
    alice.repost = vec!["t2".to_string(), "t4".to_string()];
    alice.questions = vec!["q1".to_string()];
    alice.repost_question = vec!["q2".to_string()];
    let mut bob = User::new("bob", "acct_bob", "Bob", "bob");
    bob.threads = vec!["t2".to_string(), "t4".to_string()];
    store.save_user(&alice).await.unwrap();
    store.save_user(&bob).await.unwrap();

    let mut club = Community::new("club", "org_club", "Book Club", "books");
    club.members = vec!["bob".to_string(), "alice".to_string()];
    club.threads = vec!["t1".to_string(), "t2".to_string()];
    club.questions = vec!["q1".to_string()];
    store.save_community(&club).await.unwrap();

    let mut t1 = Post::new("t1", PostKind::Thread, "alice", "first").in_community("club").with_created_at(at(base, 10));
    t1.children = vec!["r1".to_string()];
    let r1 = Post::new("r1", PostKind::Thread, "bob", "reply").reply_to("t1").with_created_at(at(base, 40));
    let t2 = Post::new("t2", PostKind::Thread, "bob", "bob writes").in_community("club").with_created_at(at(base, 20));
    let t3 = Post::new("t3", PostKind::Thread, "alice", "latest").with_created_at(at(base, 30));
    let mut t4 = Post::new("t4", PostKind::Thread, "bob", "same time").with_created_at(at(base, 10));
    t4.repost = vec!["alice".to_string()];
    let q1 = Post::new("q1", PostKind::Question, "alice", "why?").in_community("club").with_created_at(at(base, 5));
    let q2 = Post::new("q2", PostKind::Question, "bob", "how?").with_created_at(at(base, 50));

    for post in [&t1, &r1, &t2, &t3, &t4, &q1, &q2] {
        store.save_post(post).await.unwrap();
    }
    store
}

fn ids(posts: &[threads_feed::PostView]) -> Vec<&str> {
    posts.iter().map(|p| p.id.as_str()).collect()
}

#[tokio::test]
async fn test_user_posts_merge_own_and_reposts_newest_first() {
    let store = seed().await;
    let aggregator = FeedAggregator::new(store);

    let posts = aggregator.fetch_user_posts(&UserKey::account("acct_alice")).await.unwrap();

    // t1 and t4 share a timestamp; t1 comes first in own-then-reposts order
    assert_eq!(ids(&posts), vec!["t3", "t2", "t1", "t4"]);
}

#[tokio::test]
async fn test_user_posts_resolve_author_community_and_replies() {
    let store = seed().await;
    let aggregator = FeedAggregator::new(store);

    let posts = aggregator.fetch_user_posts(&UserKey::record("alice")).await.unwrap();
    let t1 = posts.iter().find(|p| p.id == "t1").unwrap();

    assert_eq!(t1.author.as_ref().unwrap().name, "Alice");
    assert_eq!(t1.community.as_ref().unwrap().name, "Book Club");
    assert_eq!(t1.content, "first");
    assert_eq!(t1.reply_count, 1);
    assert_eq!(t1.replies[0].author.as_ref().unwrap().name, "Bob");

    let t4 = posts.iter().find(|p| p.id == "t4").unwrap();
    assert_eq!(t4.author.as_ref().unwrap().name, "Bob");
    assert!(t4.community.is_none());
    assert_eq!(t4.repost_count, 1);
}

#[tokio::test]
async fn test_user_questions_use_question_collections() {
    let store = seed().await;
    let aggregator = FeedAggregator::new(store);

    let questions = aggregator.fetch_user_questions(&UserKey::record("alice")).await.unwrap();
    assert_eq!(ids(&questions), vec!["q2", "q1"]);
    assert!(questions.iter().all(|q| q.kind == PostKind::Question));
}

#[tokio::test]
async fn test_missing_user_is_not_found() {
    let store = seed().await;
    let aggregator = FeedAggregator::new(store);

    let err = aggregator.fetch_user_posts(&UserKey::account("acct_nobody")).await.unwrap_err();
    assert!(matches!(err, FeedError::NotFound(_)));

    let err = aggregator.fetch_user_questions(&UserKey::record("nobody")).await.unwrap_err();
    assert!(matches!(err, FeedError::NotFound(_)));
}

#[tokio::test]
async fn test_user_without_posts_has_empty_feed() {
    let store = seed().await;
    store.save_user(&User::new("carol", "acct_carol", "Carol", "carol")).await.unwrap();
    let aggregator = FeedAggregator::new(store);

    let posts = aggregator.fetch_user_posts(&UserKey::record("carol")).await.unwrap();
    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_large_feed_is_fetched_whole_and_ordered() {
    let store = Arc::new(MemoryStore::new());
    let base = Utc::now();
    let mut user = User::new("busy", "acct_busy", "Busy", "busy");

    for i in 0..500 {
        let id = format!("p{}", i);
        // Interleave timestamps so ordering work is real
        let offset = (i * 7919) % 500;
        store
            .save_post(&Post::new(&id, PostKind::Thread, "busy", "x").with_created_at(at(base, offset)))
            .await
            .unwrap();
        user.threads.push(id);
    }
    store.save_user(&user).await.unwrap();

    let posts = FeedAggregator::new(store)
        .fetch_user_posts(&UserKey::record("busy"))
        .await
        .unwrap();

    assert_eq!(posts.len(), 500);
    assert!(posts.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn test_community_feeds() {
    let store = seed().await;
    let aggregator = FeedAggregator::new(store);

    let threads = aggregator.fetch_community_posts("club", PostKind::Thread).await.unwrap();
    assert_eq!(ids(&threads), vec!["t2", "t1"]);

    let members = aggregator.fetch_community_members("club").await.unwrap();
    let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Alice"]);

    let err = aggregator.fetch_community_members("nowhere").await.unwrap_err();
    assert!(matches!(err, FeedError::NotFound(_)));
}

#[tokio::test]
async fn test_feed_result_is_selected_by_type() {
    let store = seed().await;
    let aggregator = FeedAggregator::new(store);
    let alice = UserKey::record("alice");

    match aggregator.load_profile_feed(&alice, FeedType::Threads).await.unwrap() {
        FeedResult::Threads(posts) => assert_eq!(posts.len(), 4),
        other => panic!("expected threads, got {:?}", other),
    }
    match aggregator.load_profile_feed(&alice, FeedType::Anonymous).await.unwrap() {
        FeedResult::Questions(questions) => assert_eq!(questions.len(), 2),
        other => panic!("expected questions, got {:?}", other),
    }
    assert_eq!(
        aggregator.load_profile_feed(&alice, FeedType::Followers).await.unwrap(),
        FeedResult::Empty
    );

    match aggregator.load_community_feed("club", FeedType::Members).await.unwrap() {
        FeedResult::Members(members) => assert_eq!(members.len(), 2),
        other => panic!("expected members, got {:?}", other),
    }
    match aggregator.load_community_feed("club", FeedType::Anonymous).await.unwrap() {
        FeedResult::Questions(questions) => assert_eq!(questions.len(), 1),
        other => panic!("expected questions, got {:?}", other),
    }
}
