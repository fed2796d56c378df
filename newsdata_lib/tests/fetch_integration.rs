use std::time::{Duration, Instant};

use newsdata_lib::{
    EndpointKind, FetchConfig, NewsClient, NewsDataError, NewsFilters, PageProgress, Termination,
};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn article(id: usize) -> Value {
    json!({
        "article_id": format!("id-{}", id),
        "title": format!("Story {}", id),
        "source_id": format!("src{}", id % 3),
        "source_name": format!("Source {}", id % 3),
        "pubDate": "2024-01-02 10:00:00",
        "keywords": ["markets", "null"],
        "country": ["us"],
        "category": ["business"],
        "sentiment": "positive",
        "sentiment_stats": {"positive": 60.0, "neutral": 30.0, "negative": 10.0}
    })
}

fn page(first_id: usize, count: usize, next: Option<&str>) -> Value {
    let results: Vec<Value> = (first_id..first_id + count).map(article).collect();
    json!({
        "status": "success",
        "totalResults": 42,
        "results": results,
        "nextPage": next
    })
}

fn config(server: &MockServer) -> FetchConfig {
    FetchConfig::default()
        .with_base_url(&server.uri())
        .with_archive_delay(Duration::from_millis(5))
}

fn client(server: &MockServer) -> NewsClient {
    NewsClient::with_config("test-key", config(server))
}

async fn mount_page(server: &MockServer, endpoint: &str, cursor: Option<&str>, body: Value) {
    let mock = Mock::given(method("GET")).and(path(endpoint));
    let mock = match cursor {
        None => mock.and(query_param_is_missing("page")),
        Some(c) => mock.and(query_param("page", c)),
    };
    mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

fn ids(records: &[newsdata_lib::types::Article]) -> Vec<String> {
    records
        .iter()
        .map(|a| a.extra["article_id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn fetch_all_follows_cursors_until_exhausted() {
    let server = MockServer::start().await;
    mount_page(&server, "/latest", None, page(0, 10, Some("c1"))).await;
    mount_page(&server, "/latest", Some("c1"), page(10, 10, Some("c2"))).await;
    mount_page(&server, "/latest", Some("c2"), page(20, 10, Some("c3"))).await;
    mount_page(&server, "/latest", Some("c3"), page(30, 10, Some("c4"))).await;
    mount_page(&server, "/latest", Some("c4"), page(40, 2, None)).await;

    let session = client(&server)
        .fetch_all(EndpointKind::Latest, &NewsFilters::default(), |_| {})
        .await;

    assert_eq!(session.termination, Termination::Exhausted);
    assert_eq!(session.pages_fetched, 5);
    assert_eq!(session.len(), 42);
    assert_eq!(session.total_results, Some(42));
    let expected: Vec<String> = (0..42).map(|i| format!("id-{}", i)).collect();
    assert_eq!(ids(&session.records), expected);
}

#[tokio::test]
async fn fetch_all_sends_key_and_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("apikey", "test-key"))
        .and(query_param("q", "solar"))
        .and(query_param("country", "de"))
        .and(query_param("timeframe", "6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0, 1, None)))
        .expect(1)
        .mount(&server)
        .await;

    let filters = NewsFilters::default()
        .with_query("solar")
        .with_country("de")
        .with_timeframe(newsdata_lib::Timeframe::hours(6));
    let session = client(&server)
        .fetch_all(EndpointKind::Latest, &filters, |_| {})
        .await;

    assert_eq!(session.termination, Termination::Exhausted);
    let request = session.last_request.unwrap();
    assert_eq!(request.params["q"], "solar");
    assert!(!request.params.contains_key("apikey"));
    assert!(!request.url.contains("test-key"));
}

#[tokio::test]
async fn rate_limit_keeps_earlier_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "/latest", None, page(0, 10, Some("c1"))).await;
    mount_page(&server, "/latest", Some("c1"), page(10, 10, Some("c2"))).await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("page", "c2"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let session = client(&server)
        .fetch_all(EndpointKind::Latest, &NewsFilters::default(), |_| {})
        .await;

    assert_eq!(session.termination, Termination::RateLimited);
    assert!(session.termination.is_error());
    assert_eq!(session.pages_fetched, 2);
    assert_eq!(session.len(), 20);
}

#[tokio::test]
async fn page_budget_stops_endless_cursors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0, 5, Some("again"))))
        .expect(2)
        .mount(&server)
        .await;

    let session = NewsClient::with_config("k", config(&server).with_max_pages(2))
        .fetch_all(EndpointKind::Latest, &NewsFilters::default(), |_| {})
        .await;

    assert_eq!(session.termination, Termination::MaxPagesReached);
    assert!(!session.termination.is_error());
    assert_eq!(session.pages_fetched, 2);
    assert_eq!(session.len(), 10);
}

#[tokio::test]
async fn zero_page_budget_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0, 1, None)))
        .expect(0)
        .mount(&server)
        .await;

    let session = NewsClient::with_config("k", config(&server).with_max_pages(0))
        .fetch_all(EndpointKind::Latest, &NewsFilters::default(), |_| {})
        .await;

    assert_eq!(session.termination, Termination::MaxPagesReached);
    assert!(session.is_empty());
}

#[tokio::test]
async fn api_error_mid_fetch_keeps_records() {
    let server = MockServer::start().await;
    mount_page(&server, "/latest", None, page(0, 10, Some("c1"))).await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("page", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "results": {"message": "Daily quota exceeded", "code": "RateLimitExceeded"}
        })))
        .mount(&server)
        .await;

    let session = client(&server)
        .fetch_all(EndpointKind::Latest, &NewsFilters::default(), |_| {})
        .await;

    assert_eq!(
        session.termination,
        Termination::ApiError {
            message: "Daily quota exceeded".to_string()
        }
    );
    assert_eq!(session.len(), 10);
}

#[tokio::test]
async fn api_error_on_first_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "results": {"message": "The provided API key is not valid.", "code": "Unauthorized"}
        })))
        .mount(&server)
        .await;

    let session = client(&server)
        .fetch_all(EndpointKind::Latest, &NewsFilters::default(), |_| {})
        .await;

    assert!(matches!(session.termination, Termination::ApiError { .. }));
    assert!(session.is_empty());
    assert_eq!(session.pages_fetched, 0);
}

#[tokio::test]
async fn malformed_body_is_transport_error() {
    let server = MockServer::start().await;
    mount_page(&server, "/latest", None, page(0, 3, Some("c1"))).await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("page", "c1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let session = client(&server)
        .fetch_all(EndpointKind::Latest, &NewsFilters::default(), |_| {})
        .await;

    assert!(matches!(
        session.termination,
        Termination::TransportError { .. }
    ));
    assert_eq!(session.len(), 3);
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let config = FetchConfig::default()
        .with_base_url("http://127.0.0.1:9")
        .with_request_timeout(Duration::from_secs(2));
    let session = NewsClient::with_config("secret-key", config)
        .fetch_all(EndpointKind::Latest, &NewsFilters::default(), |_| {})
        .await;

    match &session.termination {
        Termination::TransportError { message } => assert!(!message.contains("secret-key")),
        other => panic!("expected transport error, got {:?}", other),
    }
    assert!(session.is_empty());
}

#[tokio::test]
async fn archive_pauses_between_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "/archive", None, page(0, 2, Some("a1"))).await;
    mount_page(&server, "/archive", Some("a1"), page(2, 2, Some("a2"))).await;
    mount_page(&server, "/archive", Some("a2"), page(4, 1, None)).await;

    let config = config(&server).with_archive_delay(Duration::from_millis(50));
    let started = Instant::now();
    let session = NewsClient::with_config("k", config)
        .fetch_all(EndpointKind::Archive, &NewsFilters::default(), |_| {})
        .await;

    assert_eq!(session.termination, Termination::Exhausted);
    assert_eq!(session.len(), 5);
    // two pauses, none after the last page
    assert!(started.elapsed() >= Duration::from_millis(100));
    let request = session.last_request.unwrap();
    assert!(request.params.contains_key("from_date"));
    assert!(!request.params.contains_key("timeframe"));
}

#[tokio::test]
async fn progress_reported_once_per_page_in_order() {
    let server = MockServer::start().await;
    mount_page(&server, "/crypto", None, page(0, 4, Some("p1"))).await;
    mount_page(&server, "/crypto", Some("p1"), page(4, 4, Some("p2"))).await;
    mount_page(&server, "/crypto", Some("p2"), page(8, 1, None)).await;

    let mut seen: Vec<PageProgress> = Vec::new();
    let session = client(&server)
        .fetch_all(EndpointKind::Crypto, &NewsFilters::default(), |p| seen.push(p))
        .await;

    assert_eq!(session.pages_fetched, 3);
    let pages: Vec<usize> = seen.iter().map(|p| p.page).collect();
    let records: Vec<usize> = seen.iter().map(|p| p.records).collect();
    assert_eq!(pages, vec![1, 2, 3]);
    assert_eq!(records, vec![4, 8, 9]);
    assert!(seen.iter().all(|p| p.max_pages == 50));
}

#[tokio::test]
async fn session_snapshot_aggregates_records() {
    let server = MockServer::start().await;
    mount_page(&server, "/latest", None, page(0, 6, None)).await;

    let session = client(&server)
        .fetch_all(EndpointKind::Latest, &NewsFilters::default(), |_| {})
        .await;
    let snapshot = session.snapshot();

    assert_eq!(snapshot.total_articles, 6);
    assert_eq!(snapshot.unique_sources, 3);
    assert_eq!(snapshot.top_countries, vec![("US".to_string(), 6)]);
    assert_eq!(snapshot.keywords, vec![("markets".to_string(), 6)]);
    assert_eq!(snapshot.sentiment.unwrap().avg_positive, 60.0);
}

#[tokio::test]
async fn preview_reports_total_results() {
    let server = MockServer::start().await;
    mount_page(&server, "/latest", None, page(0, 10, Some("c1"))).await;

    let preview = client(&server)
        .preview(EndpointKind::Latest, &NewsFilters::default().with_query("ai"))
        .await
        .unwrap();

    assert_eq!(preview.total_results, 42);
    assert_eq!(preview.first_page_count, 10);
    assert!(preview.request.url.ends_with("/latest"));
    assert_eq!(preview.request.params["q"], "ai");
}

#[tokio::test]
async fn preview_surfaces_api_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "results": {"message": "The provided API key is not valid.", "code": "Unauthorized"}
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .preview(EndpointKind::Latest, &NewsFilters::default())
        .await
        .unwrap_err();

    match err {
        NewsDataError::Rejected(msg) => assert_eq!(msg, "The provided API key is not valid."),
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn preview_rate_limited_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client(&server)
        .preview(EndpointKind::Latest, &NewsFilters::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        NewsDataError::Api(newsdata_lib::newsdata_api::Error::RateLimited)
    ));
}
