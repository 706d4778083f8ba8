//! Integration tests for pagination
//!
//! These tests use wiremock to emulate a forum that clamps out-of-range page
//! requests by redirecting to its last valid page.

mod common;

use common::{forum_page, mount_page, mount_redirect, test_config};
use spacer::crawler::{EntityKind, Exhaustion, PageFetcher, PageStep, Paginator, ThreadLister};
use spacer::storage::SqliteStorage;
use spacer::Coordinator;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const THREAD: &str = "mars-rover.37226";

/// Serves a three-page thread whose page 4 redirects back to page 3
async fn three_page_thread() -> MockServer {
    let server = MockServer::start().await;
    mount_page(&server, "/threads/mars-rover.37226", "page one".to_string()).await;
    mount_page(&server, "/threads/mars-rover.37226/page-2", "page two".to_string()).await;
    mount_page(&server, "/threads/mars-rover.37226/page-3", "page three".to_string()).await;
    mount_redirect(
        &server,
        "/threads/mars-rover.37226/page-4",
        "/threads/mars-rover.37226/page-3",
    )
    .await;
    server
}

fn paginator(server: &MockServer, start: u32, n_max: Option<usize>) -> Paginator {
    let fetcher = PageFetcher::from_config(&test_config(server, false)).unwrap();
    Paginator::new(fetcher, EntityKind::PostThread, THREAD, start, n_max)
}

#[tokio::test]
async fn test_full_walk_stops_at_echo() {
    let server = three_page_thread().await;

    let pages = paginator(&server, 1, None).collect_pages().await.unwrap();

    let numbers: Vec<u32> = pages.iter().map(|p| p.page).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    let bodies: Vec<&str> = pages.iter().map(|p| p.body.as_str()).collect();
    assert_eq!(bodies, vec!["page one", "page two", "page three"]);
    assert_eq!(pages[0].url.path(), "/threads/mars-rover.37226");
    assert_eq!(pages[2].url.path(), "/threads/mars-rover.37226/page-3");
}

#[tokio::test]
async fn test_echo_is_reported_not_raised() {
    let server = three_page_thread().await;
    let mut paginator = paginator(&server, 3, None);

    assert!(matches!(paginator.step().await.unwrap(), PageStep::Page(p) if p.page == 3));

    let end = paginator.step().await.unwrap();
    assert!(matches!(
        end,
        PageStep::Exhausted(Exhaustion::Echo {
            requested: 4,
            actual: 3
        })
    ));

    // Later pulls repeat the terminal marker without fetching again
    assert!(paginator.next_page().await.unwrap().is_none());
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_cap_limits_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "/threads/mars-rover.37226", "page one".to_string()).await;
    mount_page(&server, "/threads/mars-rover.37226/page-2", "page two".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/threads/mars-rover.37226/page-3"))
        .respond_with(ResponseTemplate::new(200).set_body_string("page three"))
        .expect(0)
        .mount(&server)
        .await;

    let pages = paginator(&server, 1, Some(2)).collect_pages().await.unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].page, 2);
}

#[tokio::test]
async fn test_zero_cap_makes_no_requests() {
    let server = three_page_thread().await;

    let pages = paginator(&server, 1, Some(0)).collect_pages().await.unwrap();

    assert!(pages.is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_walk_from_later_start() {
    let server = three_page_thread().await;

    let pages = paginator(&server, 2, None).collect_pages().await.unwrap();

    let numbers: Vec<u32> = pages.iter().map(|p| p.page).collect();
    assert_eq!(numbers, vec![2, 3]);
}

#[tokio::test]
async fn test_single_page_thread_redirects_to_landing() {
    let server = MockServer::start().await;
    mount_page(&server, "/threads/short.9", "only page".to_string()).await;
    mount_redirect(&server, "/threads/short.9/page-2", "/threads/short.9").await;

    let fetcher = PageFetcher::from_config(&test_config(&server, false)).unwrap();
    let mut paginator = Paginator::new(fetcher, EntityKind::PostThread, "short.9", 1, None);

    assert_eq!(paginator.next_page().await.unwrap().unwrap().body, "only page");
    assert!(matches!(
        paginator.step().await.unwrap(),
        PageStep::Exhausted(Exhaustion::Echo {
            requested: 2,
            actual: 1
        })
    ));
}

#[tokio::test]
async fn test_transport_failure_propagates() {
    let server = MockServer::start().await;
    mount_page(&server, "/threads/mars-rover.37226", "page one".to_string()).await;
    Mock::given(method("GET"))
        .and(path("/threads/mars-rover.37226/page-2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut paginator = paginator(&server, 1, None);

    assert!(paginator.next_page().await.unwrap().is_some());
    assert!(paginator.next_page().await.is_err());
    assert_eq!(paginator.cursor().page, 2);
}

#[tokio::test]
async fn test_walk_forum_dedups_slugs_across_pages() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/forums/space-exploration.4",
        forum_page(&["mars-rover.37226", "artemis.40001"]),
    )
    .await;
    mount_page(
        &server,
        "/forums/space-exploration.4/page-2",
        forum_page(&["artemis.40001", "jwst.512"]),
    )
    .await;
    mount_redirect(
        &server,
        "/forums/space-exploration.4/page-3",
        "/forums/space-exploration.4/page-2",
    )
    .await;

    let storage = SqliteStorage::open_in_memory().unwrap();
    let coordinator = Coordinator::new(test_config(&server, false), storage).unwrap();
    let slugs = coordinator
        .walk_forum("space-exploration.4", 1, None)
        .await
        .unwrap();

    assert_eq!(slugs, vec!["mars-rover.37226", "artemis.40001", "jwst.512"]);

    // A single listing page keeps duplicates
    let page_two = coordinator.get_threads("space-exploration.4", 2).await.unwrap();
    assert_eq!(page_two, vec!["artemis.40001", "jwst.512"]);
}

#[tokio::test]
async fn test_thread_lister_never_opens_database() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/forums/space-exploration.4",
        forum_page(&["mars-rover.37226"]),
    )
    .await;
    mount_redirect(
        &server,
        "/forums/space-exploration.4/page-2",
        "/forums/space-exploration.4",
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("spacer.db");
    let mut config = test_config(&server, true);
    config.storage.database_path = db_path.to_string_lossy().into_owned();

    let lister = ThreadLister::new(&config).unwrap();
    let slugs = lister
        .walk_forum("space-exploration.4", 1, None)
        .await
        .unwrap();

    assert_eq!(slugs, vec!["mars-rover.37226"]);
    assert!(!db_path.exists());
}
