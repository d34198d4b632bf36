//! Canned upstream payloads shaped like twitterapi.io responses.

use serde_json::{Value, json};

/// `GET /user/info` for a given screen name.
pub fn user_info(user_name: &str) -> Value {
    json!({
        "status": "success",
        "msg": "success",
        "data": {
            "id": "12",
            "userName": user_name,
            "name": "Jack",
            "followers": 6_500_000,
            "following": 4_000,
            "isBlueVerified": true,
            "createdAt": "Tue Mar 21 20:50:14 +0000 2006"
        }
    })
}

/// A page of tweets as returned by the timeline and search endpoints.
pub fn tweet_page(ids: &[&str]) -> Value {
    let tweets: Vec<Value> = ids
        .iter()
        .map(|id| {
            json!({
                "type": "tweet",
                "id": id,
                "text": format!("tweet {id}"),
                "likeCount": 3,
                "retweetCount": 1,
                "author": {"userName": "jack"}
            })
        })
        .collect();

    json!({
        "status": "success",
        "tweets": tweets,
        "has_next_page": false,
        "next_cursor": ""
    })
}

/// A successful `POST /user_login_v2` response carrying a session cookie.
pub fn login_success(cookie: &str) -> Value {
    json!({
        "status": "success",
        "msg": "login success",
        "login_cookie": cookie
    })
}

/// A successful `POST /create_tweet_v2` response.
pub fn tweet_created(tweet_id: &str) -> Value {
    json!({
        "status": "success",
        "msg": "success",
        "tweet_id": tweet_id
    })
}

/// An upstream error body.
pub fn api_error(message: &str) -> Value {
    json!({
        "status": "error",
        "message": message
    })
}
