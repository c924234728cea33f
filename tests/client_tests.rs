// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client request/response tests.
//!
//! These tests verify that:
//! 1. Stored access tokens are sent as bearer auth, and absent tokens send no header
//! 2. Callers receive the envelope's `data`, never the envelope
//! 3. Mutations with a `message` raise a success notification; reads do not

use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use stemlab_client::client::envelope::Page;
use stemlab_client::error::ApiError;
use stemlab_client::storage::MemoryTokenStore;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{ok, test_client};

#[derive(Debug, Deserialize, PartialEq)]
struct Post {
    id: String,
    title: String,
}

#[tokio::test]
async fn test_stored_token_sent_as_bearer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!({"id": "u1"}))))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_access_token("abc123"));
    let (client, _) = test_client(&server, store);

    let data: Value = client.get("/auth/profile").await.unwrap();
    assert_eq!(data["id"], "u1");
}

#[tokio::test]
async fn test_no_token_means_no_authorization_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/faqs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([]))))
        .mount(&server)
        .await;

    let (client, _) = test_client(&server, Arc::new(MemoryTokenStore::new()));
    let faqs: Vec<Value> = client.get("/faqs").await.unwrap();
    assert!(faqs.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_get_returns_data_not_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blog/posts"))
        .and(query_param("status", "PUBLISHED"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"id": "p1", "title": "Robotics 101"},
                {"id": "p2", "title": "Setting up a tinkering lab"}
            ],
            "meta": {"page": 1, "total": 9}
        })))
        .mount(&server)
        .await;

    let (client, recorder) = test_client(&server, Arc::new(MemoryTokenStore::new()));

    let posts: Vec<Post> = client
        .get_with_query("/blog/posts", &json!({"status": "PUBLISHED", "page": 1}))
        .await
        .unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].title, "Robotics 101");

    // Pagination metadata is available through get_page
    let page: Page<Post> = client
        .get_page("/blog/posts", &json!({"status": "PUBLISHED", "page": 1}))
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.meta.page, 1);
    assert_eq!(page.meta.total, 9);

    // Reads never notify
    assert!(recorder.events().is_empty());
}

#[tokio::test]
async fn test_mutation_message_raises_success_notification() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/faqs"))
        .and(body_json(json!({"question": "Q?", "answer": "A."})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "message": "FAQ created successfully",
            "data": {"id": "f1"}
        })))
        .mount(&server)
        .await;

    let (client, recorder) = test_client(&server, Arc::new(MemoryTokenStore::new()));
    let created: Value = client
        .post("/faqs", &json!({"question": "Q?", "answer": "A."}))
        .await
        .unwrap();

    assert_eq!(created["id"], "f1");
    assert_eq!(recorder.successes(), vec!["FAQ created successfully"]);
}

#[tokio::test]
async fn test_undecodable_mutation_reports_only_the_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/blog/posts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "message": "Post created",
            "data": {"id": 42}
        })))
        .mount(&server)
        .await;

    let (client, recorder) = test_client(&server, Arc::new(MemoryTokenStore::new()));
    let result: Result<Post, _> = client.post("/blog/posts", &json!({"title": "T"})).await;

    assert!(matches!(result, Err(ApiError::Decode(_))));
    assert!(recorder.successes().is_empty());
    assert_eq!(recorder.errors(), vec![ApiError::GENERIC_MESSAGE]);
}

#[tokio::test]
async fn test_get_with_message_does_not_notify() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/analytics/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Stats fetched",
            "data": {"totalPosts": 3}
        })))
        .mount(&server)
        .await;

    let (client, recorder) = test_client(&server, Arc::new(MemoryTokenStore::new()));
    let _: Value = client.get("/analytics/dashboard").await.unwrap();
    assert!(recorder.successes().is_empty());
}

#[tokio::test]
async fn test_delete_without_data() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/gallery/g1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "message": "Image deleted"})),
        )
        .mount(&server)
        .await;

    let (client, recorder) = test_client(&server, Arc::new(MemoryTokenStore::new()));
    client.delete::<()>("/gallery/g1").await.unwrap();
    assert_eq!(recorder.successes(), vec!["Image deleted"]);
}

#[tokio::test]
async fn test_success_false_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/faqs/f1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "FAQ is locked"
        })))
        .mount(&server)
        .await;

    let (client, recorder) = test_client(&server, Arc::new(MemoryTokenStore::new()));
    let result: Result<Value, _> = client.put("/faqs/f1", &json!({"order": 2})).await;

    assert!(matches!(
        result,
        Err(ApiError::Api { status: 200, ref message }) if message == "FAQ is locked"
    ));
    assert_eq!(recorder.errors(), vec!["FAQ is locked"]);
    assert!(recorder.successes().is_empty());
}
