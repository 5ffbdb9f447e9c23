mod common;

use axum::http::Method;
use axum_test::TestServer;
use linkr::domain::background_job::BackgroundJob;
use linkr::routes::router;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn destination(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/target"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_unchecked_link_redirects_and_is_verified() {
    let mut app = common::create_test_app();
    let dest = destination(200).await;
    let url = format!("{}/target", dest.uri());
    app.seed("abc", &url).await;

    let server = TestServer::new(router(app.state.clone())).unwrap();

    let response = server
        .get("/abc")
        .add_header("Referer", "https://google.com")
        .add_header("User-Agent", "Mozilla/5.0")
        .await;

    assert_eq!(response.status_code(), 303);
    assert_eq!(response.header("location"), url.as_str());

    assert_eq!(app.run_jobs().await, 2);

    let link = app.link("abc").await;
    assert_eq!(link.clicks, 1);
    assert_eq!(link.last_status_code, 200);

    let stats = app.stats.all().await;
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].link_id, link.id);
    assert_eq!(stats[0].status_code, 200);
    assert_eq!(stats[0].referrer, "https://google.com");
    assert_eq!(stats[0].user_agent, "Mozilla/5.0");
}

#[tokio::test]
async fn test_unreachable_destination_shows_interstitial_on_next_visit() {
    let mut app = common::create_test_app();
    // Nothing listens on the discard port, so the probe fails to connect.
    app.seed("dead", "http://127.0.0.1:9/").await;

    let server = TestServer::new(router(app.state.clone())).unwrap();

    let first = server.get("/dead").await;
    assert_eq!(first.status_code(), 303);
    app.run_jobs().await;

    let link = app.link("dead").await;
    assert_eq!(link.last_status_code, 503);
    assert_eq!(link.clicks, 1);

    let second = server.get("/dead").await;
    assert_eq!(second.status_code(), 200);
    assert!(second.text().contains("http://127.0.0.1:9/"));
    app.run_jobs().await;

    let link = app.link("dead").await;
    assert_eq!(link.clicks, 2);
    assert_eq!(link.last_status_code, 503);

    let stats = app.stats.all().await;
    assert_eq!(stats.len(), 2);
    assert!(stats.iter().all(|s| s.status_code == 503));
}

#[tokio::test]
async fn test_recovered_destination_redirects_again() {
    let mut app = common::create_test_app();
    let dest = destination(200).await;
    let url = format!("{}/target", dest.uri());
    app.seed_with_status("flaky", &url, 404).await;

    let server = TestServer::new(router(app.state.clone())).unwrap();

    let first = server.get("/flaky").await;
    assert_eq!(first.status_code(), 200);
    assert!(first.text().contains(&url));

    app.run_jobs().await;
    assert_eq!(app.link("flaky").await.last_status_code, 200);

    let second = server.get("/flaky").await;
    assert_eq!(second.status_code(), 303);
}

#[tokio::test]
async fn test_non_200_success_status_is_treated_as_broken() {
    let mut app = common::create_test_app();
    let dest = destination(204).await;
    let url = format!("{}/target", dest.uri());
    app.seed("nocontent", &url).await;

    let server = TestServer::new(router(app.state.clone())).unwrap();

    server.get("/nocontent").await;
    app.run_jobs().await;
    assert_eq!(app.link("nocontent").await.last_status_code, 204);

    let response = server.get("/nocontent").await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_unknown_token_is_not_found_without_side_effects() {
    let mut app = common::create_test_app();
    app.seed("abc", "https://example.com").await;

    let server = TestServer::new(router(app.state.clone())).unwrap();

    let response = server.get("/ghost").await;

    response.assert_status_not_found();
    assert!(response.text().contains("/ghost"));
    assert!(app.take_jobs().is_empty());
    assert!(app.stats.is_empty().await);
    assert_eq!(app.link("abc").await.clicks, 0);
}

#[tokio::test]
async fn test_inactive_link_is_gone_without_side_effects() {
    let mut app = common::create_test_app();
    app.seed_inactive("old", "https://example.com").await;

    let server = TestServer::new(router(app.state.clone())).unwrap();

    let response = server.get("/old").await;

    assert_eq!(response.status_code(), 410);
    assert!(response.text().contains("not currently active"));
    assert!(app.take_jobs().is_empty());

    let link = app.link("old").await;
    assert_eq!(link.clicks, 0);
    assert_eq!(link.last_status_code, 0);
    assert!(app.stats.is_empty().await);
}

#[tokio::test]
async fn test_each_visit_schedules_one_increment_and_one_verify() {
    let mut app = common::create_test_app();
    app.seed("abc", "https://example.com").await;

    let server = TestServer::new(router(app.state.clone())).unwrap();

    server.get("/abc").await;
    server.get("/abc").await;

    let jobs = app.take_jobs();
    let increments = jobs
        .iter()
        .filter(|j| matches!(j, BackgroundJob::IncrementClicks { .. }))
        .count();
    let verifies = jobs
        .iter()
        .filter(|j| matches!(j, BackgroundJob::Verify { .. }))
        .count();

    assert_eq!(increments, 2);
    assert_eq!(verifies, 2);
}

#[tokio::test]
async fn test_missing_headers_are_recorded_empty() {
    let mut app = common::create_test_app();
    let dest = destination(200).await;
    app.seed("abc", &format!("{}/target", dest.uri())).await;

    let server = TestServer::new(router(app.state.clone())).unwrap();

    server.get("/abc").await;
    app.run_jobs().await;

    let stats = app.stats.all().await;
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].referrer, "");
}

#[tokio::test]
async fn test_non_http_destination_is_never_redirected_to() {
    let app = common::create_test_app();
    app.seed("js", "javascript:alert(1)").await;

    let server = TestServer::new(router(app.state.clone())).unwrap();

    let response = server.get("/js").await;

    assert_eq!(response.status_code(), 500);
    assert!(response.headers().get("location").is_none());
    assert!(!response.text().contains("javascript:"));
}

#[tokio::test]
async fn test_non_http_destination_is_never_linked_from_interstitial() {
    let mut app = common::create_test_app();
    app.seed("js", "javascript:alert(1)").await;

    let server = TestServer::new(router(app.state.clone())).unwrap();

    server.get("/js").await;
    app.run_jobs().await;
    assert_eq!(app.link("js").await.last_status_code, 503);

    let response = server.get("/js").await;

    assert_eq!(response.status_code(), 500);
    assert!(!response.text().contains("javascript:"));
}

#[tokio::test]
async fn test_head_request_is_rejected_without_side_effects() {
    let mut app = common::create_test_app();
    app.seed("abc", "https://example.com").await;

    let server = TestServer::new(router(app.state.clone())).unwrap();

    let response = server.method(Method::HEAD, "/abc").await;

    assert_eq!(response.status_code(), 405);
    assert_eq!(response.header("allow"), "GET");
    assert!(app.take_jobs().is_empty());
    assert_eq!(app.link("abc").await.clicks, 0);
}
