//! MCP Tool catalog
//!
//! The fixed set of operations the server exposes, as static descriptors.
//! Each descriptor names its parameters (with bounds and enumerations) and the
//! upstream route it resolves to, so the dispatcher needs no per-tool code.
//!
//! # Tool Categories
//!
//! ## Users
//! - `get_user_by_username` - Profile lookup by screen name
//! - `get_user_by_id` - Profile lookup by numeric id
//! - `get_user_tweets` - Most recent tweets of a user
//! - `get_user_followers` - Followers of a user
//! - `get_user_following` - Accounts a user follows
//! - `search_users` - Search accounts by keyword
//!
//! ## Tweets
//! - `search_tweets` - Advanced tweet search
//! - `get_tweet` - Single tweet by id
//! - `get_tweet_replies` - Replies to a tweet
//!
//! ## Session
//! - `login` - Authenticate and store the session cookie
//! - `post_tweet` - Publish a tweet (requires `login`)

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Value type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    /// Integer clamped into `min..=max`; `default` is used when absent
    Number { default: u32, min: u32, max: u32 },
    Enum { values: &'static [&'static str] },
}

/// One parameter of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSpec {
    /// Argument name as the tool caller sends it
    pub name: &'static str,
    /// Field name forwarded upstream
    pub upstream: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub kind: ParamKind,
}

impl ParameterSpec {
    const fn new(
        name: &'static str,
        upstream: &'static str,
        kind: ParamKind,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            upstream,
            description,
            required: false,
            kind,
        }
    }

    /// Optional string parameter.
    pub const fn string(name: &'static str, upstream: &'static str, description: &'static str) -> Self {
        Self::new(name, upstream, ParamKind::String, description)
    }

    /// The `count` parameter most list endpoints accept.
    pub const fn count(default: u32, max: u32) -> Self {
        Self::new(
            "count",
            "count",
            ParamKind::Number {
                default,
                min: 1,
                max,
            },
            "Number of results to return",
        )
    }

    /// Optional parameter restricted to a fixed set of values.
    pub const fn one_of(
        name: &'static str,
        upstream: &'static str,
        values: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self::new(name, upstream, ParamKind::Enum { values }, description)
    }

    /// Mark the parameter as required.
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn schema(&self) -> Value {
        match self.kind {
            ParamKind::String => json!({
                "type": "string",
                "description": self.description,
            }),
            ParamKind::Number { default, min, max } => json!({
                "type": "number",
                "description": format!("{} (default {default}, max {max})", self.description),
                "default": default,
                "minimum": min,
                "maximum": max,
            }),
            ParamKind::Enum { values } => json!({
                "type": "string",
                "enum": values,
                "description": self.description,
            }),
        }
    }
}

/// How an operation reaches the upstream API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `GET path` with the arguments as query parameters
    Query { path: &'static str },
    /// `POST path` with a JSON body; a cookie in the response opens the session
    Login { path: &'static str },
    /// `POST path` with a JSON body; requires an open session
    Write { path: &'static str },
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Query { path } | Self::Login { path } | Self::Write { path } => path,
        }
    }
}

/// A named, schema-described operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ParameterSpec],
    pub route: Route,
}

impl OperationDescriptor {
    /// Names of the required parameters, in declaration order.
    pub fn required(&self) -> Vec<&'static str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
            .collect()
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterSpec> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// JSON Schema for the tool's `inputSchema`.
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.to_string(), p.schema()))
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required(),
        })
    }

    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.input_schema(),
        }
    }
}

const SEARCH_RESULT_TYPES: &[&str] = &["recent", "popular", "mixed"];

/// The operation catalog, in listing order.
pub static OPERATIONS: &[OperationDescriptor] = &[
    // Users
    OperationDescriptor {
        name: "get_user_by_username",
        description: "Get a Twitter user's profile by username",
        parameters: &[ParameterSpec::string(
            "username",
            "userName",
            "Twitter username without the @",
        )
        .required()],
        route: Route::Query { path: "/user/info" },
    },
    OperationDescriptor {
        name: "get_user_by_id",
        description: "Get a Twitter user's profile by numeric user ID",
        parameters: &[ParameterSpec::string("user_id", "user_id", "Twitter user ID").required()],
        route: Route::Query { path: "/user/info" },
    },
    OperationDescriptor {
        name: "get_user_tweets",
        description: "Get the most recent tweets posted by a user",
        parameters: &[
            ParameterSpec::string("username", "userName", "Twitter username without the @")
                .required(),
            ParameterSpec::count(10, 100),
        ],
        route: Route::Query {
            path: "/user/last_tweets",
        },
    },
    // Tweets
    OperationDescriptor {
        name: "search_tweets",
        description: "Search tweets with Twitter advanced search syntax",
        parameters: &[
            ParameterSpec::string("query", "query", "Search query").required(),
            ParameterSpec::count(10, 100),
            ParameterSpec::one_of(
                "result_type",
                "result_type",
                SEARCH_RESULT_TYPES,
                "Which tweets to prefer",
            ),
        ],
        route: Route::Query {
            path: "/tweet/advanced_search",
        },
    },
    OperationDescriptor {
        name: "get_tweet",
        description: "Get a single tweet by ID",
        parameters: &[ParameterSpec::string("tweet_id", "tweet_id", "Tweet ID").required()],
        route: Route::Query { path: "/tweets" },
    },
    OperationDescriptor {
        name: "get_tweet_replies",
        description: "Get replies to a tweet",
        parameters: &[
            ParameterSpec::string("tweet_id", "id", "ID of the tweet to fetch replies for")
                .required(),
            ParameterSpec::count(20, 100),
        ],
        route: Route::Query {
            path: "/tweet/replies",
        },
    },
    OperationDescriptor {
        name: "get_user_followers",
        description: "Get the followers of a user",
        parameters: &[
            ParameterSpec::string("username", "userName", "Twitter username without the @")
                .required(),
            ParameterSpec::count(20, 100),
        ],
        route: Route::Query {
            path: "/user/followers",
        },
    },
    OperationDescriptor {
        name: "get_user_following",
        description: "Get the accounts a user follows",
        parameters: &[
            ParameterSpec::string("username", "userName", "Twitter username without the @")
                .required(),
            ParameterSpec::count(20, 100),
        ],
        route: Route::Query {
            path: "/user/followings",
        },
    },
    OperationDescriptor {
        name: "search_users",
        description: "Search Twitter users by keyword",
        parameters: &[
            ParameterSpec::string("query", "query", "Search query").required(),
            ParameterSpec::count(10, 50),
        ],
        route: Route::Query {
            path: "/user/search",
        },
    },
    // Session
    OperationDescriptor {
        name: "login",
        description: "Log in to a Twitter account; required before post_tweet",
        parameters: &[
            ParameterSpec::string("username", "userName", "Twitter username").required(),
            ParameterSpec::string("password", "password", "Account password").required(),
            ParameterSpec::string("email", "email", "Account email, if Twitter asks for it"),
            ParameterSpec::string(
                "totp_secret",
                "totp_secret",
                "TOTP secret for accounts with two-factor authentication",
            ),
        ],
        route: Route::Login {
            path: "/user_login_v2",
        },
    },
    OperationDescriptor {
        name: "post_tweet",
        description: "Post a tweet from the logged-in account (call login first)",
        parameters: &[
            ParameterSpec::string("text", "text", "Tweet text").required(),
            ParameterSpec::string("reply_to", "reply_to", "ID of the tweet to reply to"),
        ],
        route: Route::Write {
            path: "/create_tweet_v2",
        },
    },
];

/// Name-indexed view over [`OPERATIONS`], built once per dispatcher.
#[derive(Debug, Clone)]
pub struct Catalog {
    operations: &'static [OperationDescriptor],
    index: HashMap<&'static str, usize>,
}

impl Catalog {
    /// The standard catalog.
    pub fn standard() -> Self {
        Self::from_operations(OPERATIONS)
    }

    pub fn from_operations(operations: &'static [OperationDescriptor]) -> Self {
        let index = operations
            .iter()
            .enumerate()
            .map(|(i, op)| (op.name, i))
            .collect();
        Self { operations, index }
    }

    /// All operations, in listing order.
    pub fn operations(&self) -> &'static [OperationDescriptor] {
        self.operations
    }

    /// Tool definitions advertised by `tools/list`.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.operations
            .iter()
            .map(OperationDescriptor::to_definition)
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&'static OperationDescriptor> {
        let operations = self.operations;
        self.index.get(name).map(|&i| &operations[i])
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Tool definition for MCP protocol
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Result from a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
}

/// Content types for tool results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl ToolResult {
    /// Create a text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: content.into(),
            }],
        }
    }

    /// Create a result holding a pretty-printed JSON payload
    pub fn json(payload: &Value) -> serde_json::Result<Self> {
        Ok(Self::text(serde_json::to_string_pretty(payload)?))
    }

    /// Text of the first content block.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(|c| match c {
            ToolContent::Text { text } => text.as_str(),
        })
    }
}

/// Get all available tool definitions
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    Catalog::standard().definitions()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tool(name: &str) -> ToolDefinition {
        get_tool_definitions()
            .into_iter()
            .find(|t| t.name == name)
            .unwrap_or_else(|| panic!("tool {name} missing"))
    }

    fn required_of(tool: &ToolDefinition) -> Vec<String> {
        tool.input_schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_get_tool_definitions() {
        let names: Vec<String> = get_tool_definitions().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "get_user_by_username",
                "get_user_by_id",
                "get_user_tweets",
                "search_tweets",
                "get_tweet",
                "get_tweet_replies",
                "get_user_followers",
                "get_user_following",
                "search_users",
                "login",
                "post_tweet",
            ]
        );
    }

    #[test]
    fn test_tool_definitions_are_stable() {
        let first = serde_json::to_value(get_tool_definitions()).unwrap();
        let second = serde_json::to_value(get_tool_definitions()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tool_names_are_unique() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.len(), 11);
        for op in catalog.operations() {
            assert_eq!(catalog.get(op.name).map(|o| o.name), Some(op.name));
        }
        assert!(catalog.get("delete_tweet").is_none());
    }

    #[test]
    fn test_each_tool_has_valid_schema() {
        for tool in get_tool_definitions() {
            let schema = tool.input_schema.as_object().unwrap();
            assert_eq!(
                schema.get("type").and_then(|v| v.as_str()),
                Some("object"),
                "Tool {} schema type should be 'object'",
                tool.name
            );
            let properties = schema["properties"].as_object().unwrap();
            for required in required_of(&tool) {
                assert!(
                    properties.contains_key(&required),
                    "Tool {} requires undeclared property {}",
                    tool.name,
                    required
                );
            }
        }
    }

    #[test]
    fn test_tools_with_required_fields() {
        assert_eq!(required_of(&tool("login")), vec!["username", "password"]);
        assert_eq!(required_of(&tool("search_tweets")), vec!["query"]);
        assert_eq!(required_of(&tool("post_tweet")), vec!["text"]);
        assert_eq!(required_of(&tool("get_tweet_replies")), vec!["tweet_id"]);

        let search = tool("search_tweets");
        let properties = search.input_schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("count"));
        assert!(properties.contains_key("result_type"));
    }

    #[test]
    fn test_enum_and_bounds_are_published() {
        let search = tool("search_tweets");
        assert_eq!(
            search.input_schema["properties"]["result_type"]["enum"],
            json!(["recent", "popular", "mixed"])
        );

        let followers = tool("get_user_followers");
        let count = &followers.input_schema["properties"]["count"];
        assert_eq!(count["default"], 20);
        assert_eq!(count["maximum"], 100);
        assert_eq!(count["minimum"], 1);

        let users = tool("search_users");
        assert_eq!(users.input_schema["properties"]["count"]["maximum"], 50);
    }

    #[test]
    fn test_routes() {
        let catalog = Catalog::standard();
        assert_eq!(
            catalog.get("get_user_following").unwrap().route,
            Route::Query {
                path: "/user/followings"
            }
        );
        assert_eq!(
            catalog.get("login").unwrap().route,
            Route::Login {
                path: "/user_login_v2"
            }
        );
        assert_eq!(
            catalog.get("post_tweet").unwrap().route.path(),
            "/create_tweet_v2"
        );
        assert_eq!(
            catalog
                .get("get_tweet_replies")
                .unwrap()
                .parameter("tweet_id")
                .unwrap()
                .upstream,
            "id"
        );
    }

    #[test]
    fn test_tool_definition_serializes_input_schema_camel_case() {
        let json = serde_json::to_value(tool("get_tweet")).unwrap();
        assert!(json.get("inputSchema").is_some());
        assert!(json.get("input_schema").is_none());
    }

    #[test]
    fn test_tool_result_json() {
        let result = ToolResult::json(&json!({"b": 1, "a": 2})).unwrap();
        assert_eq!(result.content.len(), 1);
        let parsed: Value = serde_json::from_str(result.first_text().unwrap()).unwrap();
        assert_eq!(parsed, json!({"a": 2, "b": 1}));

        let serialized = serde_json::to_value(&result).unwrap();
        assert_eq!(serialized["content"][0]["type"], "text");
    }
}
