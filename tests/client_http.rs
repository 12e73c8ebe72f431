//! Integration tests for the HTTP client against a mock Censys API.
//!
//! These verify request shapes (paths, bearer auth, organization parameter,
//! JSON bodies), response decoding, retry behavior and error mapping.

use chrono::{TimeZone, Utc};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use censys_cli::client::{CountCondition, FieldValuePairBody};
use censys_cli::{get_host_history, ApiError, ApiErrorKind, CensysApi, CensysClient};

const TOKEN: &str = "censys_test_token";

fn client(server: &MockServer, max_attempts: usize) -> CensysClient {
    CensysClient::new(reqwest::Client::new(), &server.uri(), TOKEN, 1, max_attempts)
        .expect("Failed to build client")
}

#[tokio::test]
async fn test_host_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/global/asset/host/203.0.113.7"))
        .and(query_param("organization_id", "org-1"))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"resource": {"ip": "203.0.113.7", "services": []}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, 1)
        .host(Some("org-1"), "203.0.113.7")
        .await
        .unwrap();

    assert_eq!(response.data["ip"], "203.0.113.7");
    assert_eq!(response.meta.status, 200);
    assert_eq!(response.meta.method, "GET");
    assert_eq!(response.meta.attempts, 1);
}

#[tokio::test]
async fn test_timeline_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/global/asset/host/203.0.113.7/timeline"))
        .and(query_param("start_time", "2024-01-01T00:00:00Z"))
        .and(query_param("end_time", "2024-02-01T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "events": [
                    {"resource": {"event_time": "2024-01-30T10:00:00Z", "service_scanned": {"port": 22}}},
                    {"resource": {"event_time": "2024-01-29T10:00:00Z"}}
                ],
                "scanned_to": "2024-01-29T00:00:00Z"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, 1)
        .host_timeline_page(
            None,
            "203.0.113.7",
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    let page = response.data;
    assert_eq!(page.events.len(), 2);
    assert_eq!(
        page.events[0].event_time,
        Some(Utc.with_ymd_and_hms(2024, 1, 30, 10, 0, 0).unwrap())
    );
    assert_eq!(page.events[0].resource["service_scanned"]["port"], 22);
    assert_eq!(
        page.scanned_to,
        Some(Utc.with_ymd_and_hms(2024, 1, 29, 0, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn test_web_property_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/global/asset/webproperty"))
        .and(body_json(json!({
            "webproperty_ids": ["example.com:443"],
            "at_time": "2024-03-01T00:00:00Z"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                {"resource": {"hostname": "example.com", "port": 443, "endpoints": []}},
                {"resource": null}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, 1)
        .web_property_snapshot(
            None,
            "example.com:443",
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.data.len(), 1);
    assert_eq!(response.data[0]["hostname"], "example.com");
}

#[tokio::test]
async fn test_value_counts_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/threat-hunting/value-counts"))
        .and(query_param("organization_id", "org-1"))
        .and(body_json(json!({
            "query": "location.country=\"NL\"",
            "and_count_conditions": [
                {"field_value_pairs": [{"field": "services.port", "value": "22"}]},
                {"field_value_pairs": [
                    {"field": "services.port", "value": "443"},
                    {"field": "services.protocol", "value": "HTTP"}
                ]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"and_count_results": [1200, 7.0]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let conditions = vec![
        CountCondition {
            field_value_pairs: vec![FieldValuePairBody {
                field: "services.port".to_string(),
                value: "22".to_string(),
            }],
        },
        CountCondition {
            field_value_pairs: vec![
                FieldValuePairBody {
                    field: "services.port".to_string(),
                    value: "443".to_string(),
                },
                FieldValuePairBody {
                    field: "services.protocol".to_string(),
                    value: "HTTP".to_string(),
                },
            ],
        },
    ];
    let response = client(&server, 1)
        .value_counts(Some("org-1"), Some("location.country=\"NL\""), &conditions)
        .await
        .unwrap();

    assert_eq!(response.data, vec![1200, 7]);
}

#[tokio::test]
async fn test_value_counts_omits_missing_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/threat-hunting/value-counts"))
        .and(body_json(json!({"and_count_conditions": []})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, 1).value_counts(None, None, &[]).await.unwrap();
    assert!(response.data.is_empty());
}

#[tokio::test]
async fn test_error_status_maps_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/global/asset/host/198.51.100.1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "title": "Not Found",
            "detail": "host 198.51.100.1 not found"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, 3)
        .host(None, "198.51.100.1")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ApiErrorKind::NotFound);
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("host 198.51.100.1 not found"));
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, 3)
        .host(None, "203.0.113.7")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ApiErrorKind::Unauthorized);
    assert!(err.to_string().contains("bad token"));
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"resource": {"ip": "203.0.113.7"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server, 3).host(None, "203.0.113.7").await.unwrap();

    assert_eq!(response.meta.attempts, 3);
    assert_eq!(response.data["ip"], "203.0.113.7");
}

#[tokio::test]
async fn test_retries_are_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let err = client(&server, 2)
        .host(None, "203.0.113.7")
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 500, .. }));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server, 1)
        .host(None, "203.0.113.7")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ApiErrorKind::Decode);
}

#[tokio::test]
async fn test_host_history_over_http() {
    let server = MockServer::start().await;
    let events: Vec<_> = (0..100)
        .map(|i| json!({"resource": {"seq": i}}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/v3/global/asset/host/203.0.113.7/timeline"))
        .and(query_param("end_time", "2024-02-01T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"events": events, "scanned_to": "2024-01-15T00:00:00Z"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/global/asset/host/203.0.113.7/timeline"))
        .and(query_param("end_time", "2024-01-15T00:00:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {"events": [{"resource": {"seq": 100}}], "scanned_to": "2024-01-01T00:00:00Z"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let result = get_host_history(
        &client(&server, 1),
        &cancel,
        None,
        "203.0.113.7",
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(result.data.len(), 101);
    assert!(result.partial_error.is_none());
    let meta = result.meta.unwrap();
    assert_eq!(meta.page_count, 2);
    assert!(meta.url.contains("end_time=2024-01-15T00%3A00%3A00Z"));
}
