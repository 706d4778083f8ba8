//! Integration tests for the extract-and-persist crawl cycle
//!
//! These tests use wiremock to serve thread pages and an in-memory SQLite
//! store to check what a walk leaves behind.

mod common;

use common::{mount_page, mount_redirect, test_config, thread_page, PostFixture};
use spacer::crawler::Exhaustion;
use spacer::storage::{ForumStore, SqliteStorage};
use spacer::{Coordinator, SpacerError};
use std::time::Duration;
use wiremock::MockServer;

const THREAD: &str = "mars-rover.37226";

async fn two_page_thread() -> MockServer {
    let server = MockServer::start().await;

    let mut quoted = PostFixture::new(102, 8, "bob");
    quoted.body = r#"<blockquote class="bbCodeBlock bbCodeBlock--quote">alice said: Touchdown confirmed!</blockquote>
        Best   news
        all year."#;
    quoted.reactions = Some("alice, carol and 3 others");

    mount_page(
        &server,
        "/threads/mars-rover.37226",
        thread_page(&[PostFixture::new(101, 7, "alice"), quoted]),
    )
    .await;

    let mut late = PostFixture::new(103, 7, "alice");
    late.posted = "Feb 19, 2021 at 9:05 AM";
    late.reactions = Some("bob and carol");
    mount_page(&server, "/threads/mars-rover.37226/page-2", thread_page(&[late])).await;

    mount_redirect(
        &server,
        "/threads/mars-rover.37226/page-3",
        "/threads/mars-rover.37226/page-2",
    )
    .await;

    server
}

#[tokio::test]
async fn test_walk_thread_persists_posts_and_users() {
    let server = two_page_thread().await;
    let storage = SqliteStorage::open_in_memory().unwrap();
    let mut coordinator = Coordinator::new(test_config(&server, true), storage).unwrap();

    let summary = coordinator.walk_thread(THREAD, 1, None).await.unwrap();

    assert_eq!(summary.pages, 2);
    assert_eq!(summary.posts, 3);
    assert_eq!(summary.users, 2);
    assert_eq!(summary.last_page, Some(2));
    assert_eq!(
        summary.stopped,
        Exhaustion::Echo {
            requested: 3,
            actual: 2
        }
    );

    let store = coordinator.store();
    assert_eq!(store.count_posts().unwrap(), 3);
    assert_eq!(store.count_users().unwrap(), 2);

    let posts = store.posts_by_thread(THREAD).unwrap();
    let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![101, 102, 103]);

    let quoted = &posts[1];
    assert_eq!(quoted.message, "Best news all year.");
    assert_eq!(quoted.likes, 5);
    assert_eq!(quoted.user_id, 8);
    assert_eq!(posts[0].likes, 0);
    assert_eq!(posts[2].likes, 2);

    let bob = store.get_user(8).unwrap().unwrap();
    assert_eq!(bob.username, "bob");
    assert_eq!(bob.role, "Spaceman");
    assert_eq!(bob.messages, 1204);
}

#[tokio::test]
async fn test_repeated_walks_converge() {
    let server = two_page_thread().await;
    let storage = SqliteStorage::open_in_memory().unwrap();
    let mut coordinator = Coordinator::new(test_config(&server, true), storage).unwrap();

    coordinator.walk_thread(THREAD, 1, None).await.unwrap();
    let first = coordinator.store().get_post(101).unwrap().unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;
    coordinator.walk_thread(THREAD, 1, None).await.unwrap();
    let second = coordinator.store().get_post(101).unwrap().unwrap();

    assert_eq!(coordinator.store().count_posts().unwrap(), 3);
    assert_eq!(coordinator.store().count_users().unwrap(), 2);
    assert_eq!(first.message, second.message);
    assert!(second.last_updated > first.last_updated);
}

#[tokio::test]
async fn test_get_posts_returns_stamped_pairs() {
    let server = two_page_thread().await;
    let storage = SqliteStorage::open_in_memory().unwrap();
    let mut coordinator = Coordinator::new(test_config(&server, true), storage).unwrap();

    let pairs = coordinator.get_posts(THREAD, 1).await.unwrap();

    assert_eq!(pairs.len(), 2);
    for (post, user) in &pairs {
        assert_eq!(post.user_id, user.id);
        assert_eq!(post.thread, THREAD);
        assert!(post.last_updated.is_some());
        assert!(user.last_updated.is_some());
    }
}

#[tokio::test]
async fn test_persist_disabled_leaves_store_empty() {
    let server = two_page_thread().await;
    let storage = SqliteStorage::open_in_memory().unwrap();
    let mut coordinator = Coordinator::new(test_config(&server, false), storage).unwrap();

    let summary = coordinator.walk_thread(THREAD, 1, None).await.unwrap();
    let pairs = coordinator.get_posts(THREAD, 2).await.unwrap();

    assert_eq!(summary.posts, 3);
    assert!(pairs[0].0.last_updated.is_none());
    assert_eq!(coordinator.store().count_posts().unwrap(), 0);
    assert_eq!(coordinator.store().count_users().unwrap(), 0);
}

#[tokio::test]
async fn test_malformed_page_aborts_walk() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/threads/broken.1",
        thread_page(&[PostFixture::new(1, 7, "alice")]),
    )
    .await;

    let mut bad = PostFixture::new(2, 7, "alice");
    bad.posted = "yesterday";
    mount_page(
        &server,
        "/threads/broken.1/page-2",
        thread_page(&[PostFixture::new(3, 7, "alice"), bad]),
    )
    .await;

    let storage = SqliteStorage::open_in_memory().unwrap();
    let mut coordinator = Coordinator::new(test_config(&server, true), storage).unwrap();

    let result = coordinator.walk_thread("broken.1", 1, None).await;

    assert!(matches!(result, Err(SpacerError::MalformedDate { .. })));
    // Pairs persisted before the malformed block stay persisted
    let ids: Vec<i64> = coordinator
        .store()
        .posts_by_thread("broken.1")
        .unwrap()
        .iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn test_block_without_author_fails_page() {
    let server = MockServer::start().await;
    let html = thread_page(&[PostFixture::new(1, 7, "alice")])
        .replace("message-userDetails", "message-somethingElse");
    mount_page(&server, "/threads/broken.1", html).await;

    let storage = SqliteStorage::open_in_memory().unwrap();
    let mut coordinator = Coordinator::new(test_config(&server, true), storage).unwrap();

    let result = coordinator.get_posts("broken.1", 1).await;

    assert!(matches!(result, Err(SpacerError::MissingElement(_))));
    assert_eq!(coordinator.store().count_posts().unwrap(), 0);
}

#[tokio::test]
async fn test_walk_survives_reopen_on_disk() {
    let server = two_page_thread().await;
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("spacer.db");

    let storage = spacer::storage::open_storage(&db_path).unwrap();
    let mut coordinator = Coordinator::new(test_config(&server, true), storage).unwrap();
    coordinator.walk_thread(THREAD, 1, Some(1)).await.unwrap();
    drop(coordinator);

    let reopened = spacer::storage::open_storage(&db_path).unwrap();
    assert_eq!(reopened.count_posts().unwrap(), 2);
    assert_eq!(reopened.count_users().unwrap(), 2);
    assert_eq!(reopened.users_by_name("alice").unwrap().len(), 1);
}
