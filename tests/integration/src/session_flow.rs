//! End-to-end session flow
//!
//! Exercises the full stack: config resolution -> server -> dispatcher ->
//! HTTP client -> fake upstream, through a single stdio conversation.

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use twapi_mcp::TwitterMcpServer;
use twapi_mcp::config::{ConfigOverrides, resolve};
use twapi_test_utils::{FakeUpstream, fixtures};

fn call(id: u64, name: &str, arguments: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments}
    })
    .to_string()
}

fn server_for(upstream: &FakeUpstream) -> TwitterMcpServer {
    let config = resolve(&ConfigOverrides {
        api_key: Some("integration-key".to_string()),
        base_url: Some(upstream.base_url()),
        ..ConfigOverrides::default()
    })
    .unwrap();
    TwitterMcpServer::new(&config).unwrap()
}

async fn converse(server: &mut TwitterMcpServer, messages: &[String]) -> Vec<Value> {
    let input: String = messages.iter().map(|m| format!("{m}\n")).collect();
    let mut output = Vec::new();
    server.serve(input.as_bytes(), &mut output).await.unwrap();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn payload(response: &Value) -> Value {
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn test_read_login_post_conversation() {
    let upstream = FakeUpstream::start().await;
    upstream
        .mock_get("/tweet/advanced_search", fixtures::tweet_page(&["1", "2"]))
        .await;
    upstream
        .mock_post("/user_login_v2", fixtures::login_success("ct0=abc; auth_token=def"))
        .await;
    upstream
        .mock_post("/create_tweet_v2", fixtures::tweet_created("900"))
        .await;
    let mut server = server_for(&upstream);

    let responses = converse(
        &mut server,
        &[
            json!({"jsonrpc": "2.0", "id": 0, "method": "initialize", "params": {}}).to_string(),
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
            call(1, "search_tweets", json!({"query": "rust", "count": 500, "result_type": "popular"})),
            call(2, "post_tweet", json!({"text": "too early"})),
            call(3, "login", json!({"username": "jack", "password": "pw", "totp_secret": "SECRET"})),
            call(4, "post_tweet", json!({"text": "hello", "reply_to": "2"})),
        ],
    )
    .await;

    assert_eq!(responses.len(), 5);
    assert_eq!(responses[1]["id"], 1);
    assert_eq!(payload(&responses[1]), fixtures::tweet_page(&["1", "2"]));
    assert_eq!(responses[2]["error"]["code"], -32600);
    assert_eq!(payload(&responses[3]), json!({"success": true, "message": "Login successful"}));
    assert_eq!(payload(&responses[4]), fixtures::tweet_created("900"));

    let search = upstream.only_request_to("/tweet/advanced_search").await;
    assert_eq!(search.query_param("query"), Some("rust"));
    assert_eq!(search.query_param("count"), Some("100"));
    assert_eq!(search.query_param("result_type"), Some("popular"));

    let login = upstream.only_request_to("/user_login_v2").await;
    assert_eq!(login.header("x-api-key"), Some("integration-key"));
    assert_eq!(login.json_body()["userName"], "jack");
    assert_eq!(login.json_body()["totp_secret"], "SECRET");

    let post = upstream.only_request_to("/create_tweet_v2").await;
    assert_eq!(post.header("cookie"), Some("ct0=abc; auth_token=def"));
    assert_eq!(post.json_body(), json!({"text": "hello", "reply_to": "2"}));
}

#[tokio::test]
async fn test_each_server_has_its_own_session() {
    let upstream = FakeUpstream::start().await;
    upstream
        .mock_post("/user_login_v2", fixtures::login_success("cookie-one"))
        .await;
    upstream
        .mock_post("/create_tweet_v2", fixtures::tweet_created("1"))
        .await;

    let mut first = server_for(&upstream);
    let mut second = server_for(&upstream);

    converse(
        &mut first,
        &[call(1, "login", json!({"username": "a", "password": "b"}))],
    )
    .await;
    let first_post = converse(&mut first, &[call(2, "post_tweet", json!({"text": "x"}))]).await;
    let second_post = converse(&mut second, &[call(2, "post_tweet", json!({"text": "x"}))]).await;

    assert!(first_post[0].get("result").is_some());
    assert_eq!(second_post[0]["error"]["code"], -32600);
    assert_eq!(upstream.requests_to("/create_tweet_v2").await.len(), 1);
}

#[tokio::test]
async fn test_upstream_outage_surfaces_as_error_response() {
    let upstream = FakeUpstream::start().await;
    upstream
        .mock_text("GET", "/user/followers", 503, "Service Unavailable")
        .await;
    let mut server = server_for(&upstream);

    let responses = converse(
        &mut server,
        &[call(1, "get_user_followers", json!({"username": "jack"}))],
    )
    .await;

    assert_eq!(responses[0]["error"]["code"], -32603);
    assert_eq!(responses[0]["error"]["data"]["status"], 503);
    let message = responses[0]["error"]["message"].as_str().unwrap();
    assert!(message.contains("Service Unavailable"), "got: {message}");
}
