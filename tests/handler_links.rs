mod common;

use common::TestApp;
use serde_json::{Value, json};

#[tokio::test]
async fn test_create_link_with_custom_alias() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/links")
        .add_header("X-User-Id", "owner-1")
        .json(&json!({
            "destinationUrl": "https://Example.COM/spring#hero",
            "alias": "spring-sale",
            "group": "spring"
        }))
        .await;

    assert_eq!(response.status_code(), 201);
    let body = response.json::<Value>();
    assert_eq!(body["alias"], "spring-sale");
    assert_eq!(body["destinationUrl"], "https://example.com/spring");
    assert_eq!(body["group"], "spring");
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn test_create_link_generates_alias() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/links")
        .add_header("X-User-Id", "owner-1")
        .json(&json!({ "destinationUrl": "https://example.com/" }))
        .await;

    assert_eq!(response.status_code(), 201);
    let body = response.json::<Value>();
    let alias = body["alias"].as_str().unwrap();
    assert_eq!(alias.len(), 12);
    assert!(body["group"].is_null());

    let redirect = app.server.get(&format!("/r/{alias}")).await;
    assert_eq!(redirect.header("location"), "https://example.com/");
}

#[tokio::test]
async fn test_create_link_is_idempotent_for_same_destination() {
    let app = TestApp::new();
    let payload = json!({ "destinationUrl": "https://example.com/a", "alias": "same" });

    let first = app
        .server
        .post("/links")
        .add_header("X-User-Id", "owner-1")
        .json(&payload)
        .await;
    let second = app
        .server
        .post("/links")
        .add_header("X-User-Id", "owner-2")
        .json(&payload)
        .await;

    assert_eq!(first.status_code(), 201);
    assert_eq!(second.status_code(), 200);
    assert_eq!(
        first.json::<Value>()["createdAt"],
        second.json::<Value>()["createdAt"]
    );
    assert_eq!(app.destinations.len(), 1);
}

#[tokio::test]
async fn test_create_link_conflict_for_different_destination() {
    let app = TestApp::new();
    app.seed_alias("taken", "https://example.com/original", None)
        .await;

    let response = app
        .server
        .post("/links")
        .add_header("X-User-Id", "owner-1")
        .json(&json!({ "destinationUrl": "https://example.com/other", "alias": "taken" }))
        .await;

    assert_eq!(response.status_code(), 409);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "alias_conflict");

    let redirect = app.server.get("/r/taken").await;
    assert_eq!(redirect.header("location"), "https://example.com/original");
}

#[tokio::test]
async fn test_create_link_requires_identity() {
    let app = TestApp::new();

    let response = app
        .server
        .post("/links")
        .json(&json!({ "destinationUrl": "https://example.com/" }))
        .await;

    assert_eq!(response.status_code(), 401);
    assert_eq!(response.json::<Value>()["error"]["code"], "unauthorized");
    assert_eq!(app.destinations.len(), 0);
}

#[tokio::test]
async fn test_create_link_rejects_bad_input() {
    let app = TestApp::new();

    for payload in [
        json!({ "destinationUrl": "ftp://example.com/file" }),
        json!({ "destinationUrl": "not a url" }),
        json!({ "destinationUrl": "" }),
        json!({ "destinationUrl": "https://example.com/", "alias": "no spaces" }),
        json!({ "destinationUrl": "https://example.com/", "alias": "stats" }),
        json!({ "alias": "missing-url" }),
    ] {
        let response = app
            .server
            .post("/links")
            .add_header("X-User-Id", "owner-1")
            .json(&payload)
            .await;

        assert_eq!(response.status_code(), 400, "payload: {payload}");
        assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
    }

    assert_eq!(app.destinations.len(), 0);
}
