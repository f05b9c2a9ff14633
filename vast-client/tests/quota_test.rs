mod common;

use common::{TestApi, api};
use serde_json::json;
use vast_client::{Submission, VastError};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

async fn mock_lookup(app: &TestApi, quota_path: &str, listing: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(api("quotas/")))
        .and(query_param("path", quota_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing))
        .expect(1)
        .mount(&app.server)
        .await;
}

#[tokio::test]
async fn add_quota_checks_then_creates() {
    let app = TestApi::spawn().await;
    mock_lookup(&app, "/data/team", json!([])).await;
    Mock::given(method("POST"))
        .and(path(api("quotas/")))
        .and(body_json(json!({
            "name": "team",
            "path": "/data/team",
            "soft_limit": 1000,
            "hard_limit": 1000,
            "create_dir": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9, "name": "team"})))
        .expect(1)
        .mount(&app.server)
        .await;

    let client = app.client().await;
    let result = client
        .add_quota("team", "/data/team", 1000, None, false)
        .await
        .unwrap();

    assert_eq!(result, Submission::Sent(json!({"id": 9, "name": "team"})));
}

#[tokio::test]
async fn add_quota_strips_share_suffix_from_name() {
    let app = TestApi::spawn().await;
    mock_lookup(&app, "/data/team", json!({"count": 0, "results": []})).await;
    Mock::given(method("POST"))
        .and(path(api("quotas/")))
        .and(body_json(json!({
            "name": "team",
            "path": "/data/team",
            "soft_limit": 500,
            "hard_limit": 1000,
            "create_dir": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 10})))
        .expect(1)
        .mount(&app.server)
        .await;

    let client = app.client().await;
    client
        .add_quota("team$", "/data/team", 1000, Some(500), false)
        .await
        .unwrap();
}

#[tokio::test]
async fn existing_quota_is_reported_and_nothing_is_posted() {
    let app = TestApi::spawn().await;
    mock_lookup(&app, "/data/team", json!([{"id": 3, "path": "/data/team"}])).await;
    Mock::given(method("POST"))
        .and(path(api("quotas/")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.server)
        .await;

    let client = app.client().await;
    let err = client
        .add_quota("team", "/data/team", 1000, None, false)
        .await
        .unwrap_err();

    match err {
        VastError::ResourceExists(message) => {
            assert_eq!(message, "a quota already exists for /data/team on vast.test");
        }
        other => panic!("expected ResourceExists, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_quota_fails_before_any_request() {
    let app = TestApi::spawn().await;
    let client = app.client().await;

    let err = client
        .add_quota("team", "/data/team", 1000, Some(2000), false)
        .await
        .unwrap_err();
    match err {
        VastError::Validation(err) => {
            assert_eq!(err.reason, "'soft_limit' cannot be larger than 'hard_limit'");
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let err = client
        .add_quota("team", "data/team", 1000, None, false)
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let received = app.server.received_requests().await.unwrap();
    assert!(received.is_empty());
}

#[tokio::test]
async fn dry_run_returns_payload_without_posting() {
    let app = TestApi::spawn().await;
    mock_lookup(&app, "/data/team", json!([])).await;
    Mock::given(method("POST"))
        .and(path(api("quotas/")))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.server)
        .await;

    let client = app.client().await;
    let result = client
        .add_quota("team", "/data/team", 1000, Some(800), true)
        .await
        .unwrap();

    assert!(result.is_dry_run());
    assert_eq!(
        result.into_value(),
        json!({
            "name": "team",
            "path": "/data/team",
            "soft_limit": 800,
            "hard_limit": 1000,
            "create_dir": false
        })
    );
}

#[tokio::test]
async fn resize_sets_both_limits() {
    let app = TestApi::spawn().await;
    Mock::given(method("PATCH"))
        .and(path(api("quotas/12/")))
        .and(body_json(json!({"soft_limit": 4096, "hard_limit": 4096})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 12})))
        .expect(1)
        .mount(&app.server)
        .await;

    let client = app.client().await;
    let result = client.update_quota_size(12, 4096).await.unwrap();

    assert_eq!(result, json!({"id": 12}));
}

#[tokio::test]
async fn limits_update_rejects_inverted_limits() {
    let app = TestApi::spawn().await;
    let client = app.client().await;

    let err = client.update_quota_limits(12, 10, 5).await.unwrap_err();

    assert!(err.is_validation());
}

#[tokio::test]
async fn quotas_can_be_listed_by_path() {
    let app = TestApi::spawn().await;
    mock_lookup(&app, "/data/team", json!([{"id": 3}])).await;

    let client = app.client().await;
    let listing = client.get_quotas(Some("/data/team")).await.unwrap();

    assert_eq!(listing, json!([{"id": 3}]));
}
