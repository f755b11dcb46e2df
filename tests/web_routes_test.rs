//! Integration tests for web routes.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use internship_watch::allowlist::CompanyAllowlist;
use internship_watch::job::RunGuard;
use internship_watch::scrape::Scraper;
use internship_watch::web::{create_app, AppState};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_PAGE: &str = r#"<html><body><ul>
  <li><div class="base-card">
    <a class="base-card__full-link" href="https://jobs.example.com/1"></a>
    <h3 class="base-search-card__title">SWE Intern</h3>
    <h4 class="base-search-card__subtitle">Globex Systems</h4>
    <time>5 hours ago</time>
  </div></li>
  <li><div class="base-card">
    <a class="base-card__full-link" href="https://jobs.example.com/2"></a>
    <h3 class="base-search-card__title">Ops Intern</h3>
    <h4 class="base-search-card__subtitle">Hooli</h4>
    <time>2 hours ago</time>
  </div></li>
</ul></body></html>"#;

fn create_test_app(search_url: &str, guard: RunGuard) -> Router {
    let scraper = Scraper::new(
        search_url,
        CompanyAllowlist::new(["Globex"]),
        Duration::from_secs(5),
    )
    .expect("Failed to build scraper");

    create_app(AppState { scraper, guard })
}

async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app("http://127.0.0.1:9/jobs", RunGuard::new());

    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_scrape_endpoint_returns_filtered_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SEARCH_PAGE, "text/html"))
        .mount(&server)
        .await;

    let app = create_test_app(&format!("{}/jobs", server.uri()), RunGuard::new());
    let (status, json) = get(app, "/api/scrape/linkedin").await;

    assert_eq!(status, StatusCode::OK);
    let results = json["results"].as_array().expect("results array");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["company"], "Globex Systems");
    assert_eq!(results[0]["title"], "SWE Intern");
    assert_eq!(results[0]["timeAgo"], "5 hours ago");
    assert_eq!(results[0]["link"], "https://jobs.example.com/1");
    assert_eq!(results[0]["hoursSincePosted"], 5);
}

#[tokio::test]
async fn test_scrape_endpoint_reports_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let app = create_test_app(&format!("{}/jobs", server.uri()), RunGuard::new());
    let (status, json) = get(app, "/api/scrape/linkedin").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn test_scrape_endpoint_rejects_overlapping_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(SEARCH_PAGE, "text/html"))
        .mount(&server)
        .await;

    let guard = RunGuard::new();
    let in_progress = guard.try_start().expect("guard should be free");

    let app = create_test_app(&format!("{}/jobs", server.uri()), guard.clone());
    let (status, json) = get(app, "/api/scrape/linkedin").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "scrape already running");

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests.is_empty());

    drop(in_progress);
    let app = create_test_app(&format!("{}/jobs", server.uri()), guard);
    let (status, _) = get(app, "/api/scrape/linkedin").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_cors_headers_present() {
    let app = create_test_app("http://127.0.0.1:9/jobs", RunGuard::new());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .header("origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}
