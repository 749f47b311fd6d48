//! Integration tests for `AdvcakeClient` using wiremock HTTP mocks.

use advhouse_api::{AdvcakeClient, ApiError, PAGE_SIZE};
use advhouse_core::ProjectConfig;
use chrono::NaiveDate;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> AdvcakeClient {
    AdvcakeClient::with_base_url("test-pass", 30, base_url)
        .expect("client construction should not fail")
}

fn date_from() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn order_json(id: usize) -> Value {
    json!({
        "order_id": format!("ORD-{id}"),
        "created_at": "2024-03-01 10:15:00",
        "updated_at": "2024-03-02 08:00:00",
        "status": "New",
        "partner": "cpa-net",
        "webmaster": "wm-1",
        "price": 1500.0,
        "commission": 100.0,
        "drr": 6.67
    })
}

fn page_json(start: usize, rows: usize) -> Value {
    let data: Vec<Value> = (start..start + rows).map(order_json).collect();
    json!({ "total": rows, "data": data })
}

fn project(login: &str) -> ProjectConfig {
    ProjectConfig {
        login: login.to_owned(),
        project: format!("{login}-project"),
        store_name: format!("{login}-store"),
    }
}

#[tokio::test]
async fn single_short_page_issues_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/advertiser/p1"))
        .and(query_param("pass", "test-pass"))
        .and(query_param("date_from", "2024-01-01"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(0, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let orders = client
        .fetch_all_orders("p1", date_from())
        .await
        .expect("fetch should succeed");

    assert_eq!(orders.len(), 3);
    assert_eq!(orders[0].order_id, json!("ORD-0"));
}

#[tokio::test]
async fn full_page_then_short_page_issues_two_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/advertiser/p1"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(0, PAGE_SIZE)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders/advertiser/p1"))
        .and(query_param("offset", "5000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(PAGE_SIZE, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let orders = client
        .fetch_all_orders("p1", date_from())
        .await
        .expect("fetch should succeed");

    assert_eq!(orders.len(), 5003);
    assert_eq!(orders[5002].order_id, json!("ORD-5002"));
}

#[tokio::test]
async fn full_page_followed_by_empty_page_stops() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/advertiser/p1"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(0, PAGE_SIZE)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders/advertiser/p1"))
        .and(query_param("offset", "5000"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"total": 0, "data": []})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let orders = client.fetch_all_orders("p1", date_from()).await.unwrap();
    assert_eq!(orders.len(), PAGE_SIZE);
}

#[tokio::test]
async fn empty_response_returns_no_orders() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/advertiser/p1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"total": 0, "data": null})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let orders = client.fetch_all_orders("p1", date_from()).await.unwrap();
    assert!(orders.is_empty());
}

#[tokio::test]
async fn server_error_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/advertiser/p1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch_all_orders("p1", date_from()).await;

    assert!(
        matches!(
            result,
            Err(ApiError::UnexpectedStatus { status: 500, ref login, offset: 0 }) if login == "p1"
        ),
        "expected UnexpectedStatus(500), got: {result:?}"
    );
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/advertiser/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.fetch_all_orders("p1", date_from()).await;
    assert!(matches!(result, Err(ApiError::Deserialize { .. })));
}

#[tokio::test]
async fn error_message_does_not_leak_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .fetch_all_orders("p1", date_from())
        .await
        .expect_err("403 should fail");
    assert!(!err.to_string().contains("test-pass"));
}

#[tokio::test]
async fn endless_full_pages_hit_pagination_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/advertiser/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(0, PAGE_SIZE)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_max_pages(2);
    let result = client.fetch_all_orders("p1", date_from()).await;

    assert!(
        matches!(result, Err(ApiError::PaginationLimit { max_pages: 2, .. })),
        "expected PaginationLimit, got: {result:?}"
    );
}

#[tokio::test]
async fn fetch_projects_skips_projects_without_orders() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/advertiser/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(0, 2)))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders/advertiser/p2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"total": 0, "data": []})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders/advertiser/p3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(10, 1)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let batches = client
        .fetch_projects(&[project("p1"), project("p2"), project("p3")], date_from())
        .await
        .unwrap();

    let logins: Vec<&str> = batches.iter().map(|b| b.project.login.as_str()).collect();
    assert_eq!(logins, vec!["p1", "p3"]);
    assert_eq!(batches[0].orders.len(), 2);
    assert_eq!(batches[1].project.store_name, "p3-store");
}

#[tokio::test]
async fn fetch_projects_aborts_on_first_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders/advertiser/p1"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders/advertiser/p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(0, 1)))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client
        .fetch_projects(&[project("p1"), project("p2")], date_from())
        .await;
    assert!(matches!(
        result,
        Err(ApiError::UnexpectedStatus { status: 502, .. })
    ));
}

#[tokio::test]
async fn null_fields_on_an_order_do_not_fail_the_page() {
    let server = MockServer::start().await;

    let body = json!({
        "total": 2,
        "data": [
            order_json(1),
            {
                "order_id": "ORD-2",
                "created_at": null,
                "updated_at": null,
                "status": "Cancelled",
                "partner": null,
                "webmaster": null,
                "price": null,
                "commission": null,
                "drr": null
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/orders/advertiser/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let orders = client.fetch_all_orders("p1", date_from()).await.unwrap();

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].status.as_deref(), Some("New"));
    assert_eq!(orders[1].status.as_deref(), Some("Cancelled"));
    assert_eq!(orders[1].created_at, None);
    assert_eq!(orders[1].updated_at, None);
    assert!(orders[1].commission.is_null());
}

#[tokio::test]
async fn transport_error_does_not_leak_api_key() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = test_client(&uri);
    let err = client
        .fetch_orders_page("p1", date_from(), 0)
        .await
        .expect_err("closed server should fail");

    assert!(matches!(err, ApiError::Http(_)), "got: {err:?}");
    assert!(!err.to_string().contains("test-pass"));
    assert!(!format!("{err:?}").contains("test-pass"));
}
