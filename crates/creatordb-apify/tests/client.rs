//! Integration tests for `ApifyClient` using wiremock HTTP mocks.

use creatordb_apify::{ApifyClient, ApifyError};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ApifyClient {
    ApifyClient::with_base_url("test-token", 30, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn scrape_instagram_posts_returns_parsed_items() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "id": "320",
            "caption": "First post",
            "ownerUsername": "jdoe",
            "likesCount": 15,
            "commentsCount": 2,
            "latestComments": [
                {"ownerUsername": "alice", "text": "nice"},
                {"ownerUsername": "jdoe", "text": "thanks"}
            ]
        },
        {
            "id": "321",
            "caption": "Second post",
            "likesCount": 0
        }
    ]);

    Mock::given(method("POST"))
        .and(path(
            "/acts/apify~instagram-post-scraper/run-sync-get-dataset-items",
        ))
        .and(query_param("token", "test-token"))
        .and(body_partial_json(serde_json::json!({
            "username": ["jdoe"],
            "resultsLimit": 12
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let posts = client
        .scrape_instagram_posts("jdoe", 12)
        .await
        .expect("should parse posts");

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id.as_deref(), Some("320"));
    assert_eq!(posts[0].latest_comments.len(), 2);
    assert_eq!(posts[1].likes_count, Some(0));
    assert_eq!(posts[1].comments_count, None);
}

#[tokio::test]
async fn empty_dataset_is_a_normal_outcome_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(
            "/acts/apify~instagram-post-scraper/run-sync-get-dataset-items",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let posts = client
        .scrape_instagram_posts("ghost-user", 12)
        .await
        .expect("empty result is not an error");

    assert!(posts.is_empty());
}

#[tokio::test]
async fn status_408_is_classified_as_provider_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(
            "/acts/LQQIXN9Othf8f7R5n/run-sync-get-dataset-items",
        ))
        .respond_with(ResponseTemplate::new(408).set_body_string("run exceeded limit"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .scrape_linkedin_posts("jdoe-99", 3)
        .await
        .expect_err("408 must be an error");

    assert!(matches!(err, ApifyError::Timeout), "got: {err:?}");
}

#[tokio::test]
async fn other_failure_statuses_keep_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(
            "/acts/apify~instagram-scraper/run-sync-get-dataset-items",
        ))
        .respond_with(ResponseTemplate::new(402).set_body_string("insufficient credit"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .scrape_instagram_profile("https://www.instagram.com/jdoe/")
        .await
        .expect_err("402 must be an error");

    match err {
        ApifyError::Api { status, body } => {
            assert_eq!(status, 402);
            assert!(body.contains("insufficient credit"));
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_dataset_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(
            "/acts/apify~instagram-scraper/run-sync-get-dataset-items",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": "not an array"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .scrape_instagram_profile("https://www.instagram.com/jdoe/")
        .await
        .expect_err("object body must fail to parse");

    assert!(matches!(err, ApifyError::Deserialize { .. }), "got: {err:?}");
}

#[tokio::test]
async fn linkedin_comments_request_carries_post_urns_and_sort_order() {
    let server = MockServer::start().await;

    let body = serde_json::json!([
        {
            "author": {"name": "Alice Smith", "headline": "CTO at Example"},
            "post_input": "7123",
            "replies": [
                {"author": {"name": "Bob Jones", "headline": "Engineer"}, "post_input": "7123"}
            ]
        }
    ]);

    Mock::given(method("POST"))
        .and(path(
            "/acts/2XnpwxfhSW1fAWElp/run-sync-get-dataset-items",
        ))
        .and(body_partial_json(serde_json::json!({
            "postIds": ["7123"],
            "sortOrder": "most recent"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let comments = client
        .scrape_linkedin_comments(&["7123".to_string()], 3)
        .await
        .expect("should parse comments");

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].replies.len(), 1);
}
