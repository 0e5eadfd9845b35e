//! Outbound request shapes, checked against a local fake provider.

mod common;

use common::{FakeProvider, Fixture, Replies, unreachable_endpoints};
use serde_json::json;

use kookie::api::ApiError;
use kookie::api::baidu::Message;
use kookie::api::gaode::{AroundSearchRequest, SortRule};

#[tokio::test]
async fn test_address_request_carries_address_city_and_key() {
    let provider = FakeProvider::spawn(Replies::default()).await;
    let fixture = Fixture::new();
    let requester = fixture.requester(provider.endpoints());

    let response = requester.send_address_request("阜通东大街6号", "北京").await.unwrap();
    assert!(response.status().is_success());

    let hits = provider.hits_on("geo");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].params["address"], "阜通东大街6号");
    assert_eq!(hits[0].params["city"], "北京");
    assert_eq!(hits[0].params["output"], "JSON");
    assert_eq!(hits[0].params["key"], "gaode-key");
}

#[tokio::test]
async fn test_around_search_request_parameters() {
    let provider = FakeProvider::spawn(Replies::default()).await;
    let fixture = Fixture::new();
    let requester = fixture.requester(provider.endpoints());
    let request = AroundSearchRequest::new("116.481488,39.990464", "咖啡", 500, SortRule::Distance).unwrap();

    requester.send_around_search_request(&request).await.unwrap();

    let hit = &provider.hits_on("around")[0];
    assert_eq!(hit.params["location"], "116.481488,39.990464");
    assert_eq!(hit.params["types"], "咖啡");
    assert_eq!(hit.params["radius"], "500");
    assert_eq!(hit.params["sortrule"], "distance");
    assert_eq!(hit.params["offset"], "20");
    assert_eq!(hit.params["page"], "1");
    assert_eq!(hit.params["extensions"], "base");
    assert_eq!(hit.params["key"], "gaode-key");
}

#[tokio::test]
async fn test_chat_request_fetches_token_then_posts() {
    let provider = FakeProvider::spawn(Replies::default()).await;
    let fixture = Fixture::new();
    let requester = fixture.requester(provider.endpoints());
    let messages = vec![Message::user("你好"), Message::assistant("你好呀"), Message::user("今天运势？")];

    let response = requester.send_chat_request(&messages, 42).await.unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["result"], "祝你今天元气满满！");

    let routes: Vec<&str> = provider.hits().iter().map(|h| h.route).collect();
    assert_eq!(routes, vec!["token", "chat"]);

    let token = &provider.hits_on("token")[0];
    assert_eq!(token.params["grant_type"], "client_credentials");
    assert_eq!(token.params["client_id"], "baidu-id");
    assert_eq!(token.params["client_secret"], "baidu-secret");

    let chat = &provider.hits_on("chat")[0];
    assert_eq!(chat.params["access_token"], "tok-123");
    assert_eq!(chat.body["messages"].as_array().unwrap().len(), 3);
    assert_eq!(chat.body["messages"][0], json!({"role": "user", "content": "你好"}));
    assert_eq!(chat.body["messages"][1]["role"], "assistant");
    assert_eq!(chat.body["stream"], false);
    assert_eq!(chat.body["user_id"], "42");
    assert_eq!(chat.body["temperature"], json!(0.9));
    assert_eq!(chat.body["penalty_score"], json!(1.4));
}

#[tokio::test]
async fn test_token_fetched_for_every_chat_request() {
    let provider = FakeProvider::spawn(Replies::default()).await;
    let fixture = Fixture::new();
    let requester = fixture.requester(provider.endpoints());
    let messages = vec![Message::user("hi")];

    requester.send_chat_request(&messages, 1).await.unwrap();
    requester.send_chat_request(&messages, 1).await.unwrap();

    assert_eq!(provider.hits_on("token").len(), 2);
    assert_eq!(provider.hits_on("chat").len(), 2);
}

#[tokio::test]
async fn test_token_error_stops_before_chat() {
    let provider = FakeProvider::spawn(Replies {
        token: json!({"error": "invalid_client", "error_description": "unknown client id"}),
        ..Replies::default()
    })
    .await;
    let fixture = Fixture::new();
    let requester = fixture.requester(provider.endpoints());

    let err = requester.send_chat_request(&[Message::user("hi")], 1).await.unwrap_err();
    match err {
        ApiError::Token(reason) => assert_eq!(reason, "unknown client id"),
        other => panic!("expected token error, got {other}"),
    }
    assert!(provider.hits_on("chat").is_empty());
}

#[tokio::test]
async fn test_unreachable_provider_is_transport_error() {
    let fixture = Fixture::new();
    let requester = fixture.requester(unreachable_endpoints());

    let err = requester.send_address_request("a", "b").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));

    let err = requester.send_chat_request(&[Message::user("hi")], 1).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_broken_config_fails_before_any_request() {
    let provider = FakeProvider::spawn(Replies::default()).await;
    let fixture = Fixture::with_config(r#"{ "botInfo": "#);
    let requester = fixture.requester(provider.endpoints());

    let err = requester.send_address_request("a", "b").await.unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
    assert!(provider.hits().is_empty());
}

#[tokio::test]
async fn test_joke_request() {
    let provider = FakeProvider::spawn(Replies::default()).await;
    let fixture = Fixture::new();
    let requester = fixture.requester(provider.endpoints());

    requester.send_joke_request().await.unwrap();

    let hits = provider.hits_on("joke");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].params["type"], "single");
}
