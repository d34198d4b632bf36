//! MCP Tool dispatch
//!
//! [`Dispatcher`] turns a tool name plus argument bag into one upstream call:
//! look the operation up in the catalog, validate and normalize the
//! arguments against its parameter specs, build the request for its route,
//! attach credentials, and map the outcome to a [`ToolResult`] or an
//! [`Error`]. All validation happens before anything goes over the network.

use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};
use twapi_client::{ClientConfig, UpstreamClient, UpstreamRequest, is_header_safe};

use crate::session::{Session, extract_cookie};
use crate::tools::{Catalog, OperationDescriptor, ParamKind, ParameterSpec, Route, ToolResult};
use crate::{Error, Result};

/// A validated argument, ready to forward upstream
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Count(u32),
}

impl ArgValue {
    fn to_query(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Count(n) => n.to_string(),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Count(n) => Value::from(*n),
        }
    }
}

/// Arguments after validation, keyed by upstream field name in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidatedArgs {
    fields: Vec<(&'static str, ArgValue)>,
}

impl ValidatedArgs {
    pub fn get(&self, upstream: &str) -> Option<&ArgValue> {
        self.fields
            .iter()
            .find(|(name, _)| *name == upstream)
            .map(|(_, value)| value)
    }

    fn to_json_body(&self) -> Value {
        let body: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect();
        Value::Object(body)
    }
}

/// Validate a raw argument bag against an operation's parameters.
///
/// Required fields must be present and non-null; strings must be strings;
/// enum values must be one of the allowed values; counts default when absent
/// and are clamped into their bounds when present. Unknown keys are ignored.
pub fn validate_arguments(
    operation: &OperationDescriptor,
    arguments: &Map<String, Value>,
) -> Result<ValidatedArgs> {
    let mut fields = Vec::with_capacity(operation.parameters.len());

    for spec in operation.parameters {
        let raw = arguments.get(spec.name).filter(|v| !v.is_null());
        let value = match (raw, spec.kind) {
            (None, ParamKind::Number { default, .. }) => Some(ArgValue::Count(default)),
            (None, _) if spec.required => {
                return Err(Error::invalid(format!(
                    "missing required argument '{}' for {}",
                    spec.name, operation.name
                )));
            }
            (None, _) => None,
            (Some(raw), kind) => Some(normalize(spec, kind, raw)?),
        };

        if let Some(value) = value {
            fields.push((spec.upstream, value));
        }
    }

    Ok(ValidatedArgs { fields })
}

fn normalize(spec: &ParameterSpec, kind: ParamKind, raw: &Value) -> Result<ArgValue> {
    match kind {
        ParamKind::String => raw
            .as_str()
            .map(|s| ArgValue::Text(s.to_string()))
            .ok_or_else(|| Error::invalid(format!("argument '{}' must be a string", spec.name))),
        ParamKind::Enum { values } => {
            let value = raw.as_str().ok_or_else(|| {
                Error::invalid(format!("argument '{}' must be a string", spec.name))
            })?;
            if values.contains(&value) {
                Ok(ArgValue::Text(value.to_string()))
            } else {
                Err(Error::invalid(format!(
                    "argument '{}' must be one of: {}",
                    spec.name,
                    values.join(", ")
                )))
            }
        }
        ParamKind::Number { min, max, .. } => {
            let number = as_number(raw).ok_or_else(|| {
                Error::invalid(format!("argument '{}' must be a number", spec.name))
            })?;
            Ok(ArgValue::Count(clamp_count(number, min, max)))
        }
    }
}

fn as_number(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Truncate and clamp a requested count into `min..=max`.
pub fn clamp_count(requested: f64, min: u32, max: u32) -> u32 {
    let truncated = requested.trunc();
    if truncated <= f64::from(min) {
        min
    } else if truncated >= f64::from(max) {
        max
    } else {
        truncated as u32
    }
}

/// Validates tool calls and proxies them to the upstream API.
///
/// Owns the [`Session`]; two dispatchers never share login state.
#[derive(Debug)]
pub struct Dispatcher {
    client: UpstreamClient,
    session: Session,
    catalog: Catalog,
}

impl Dispatcher {
    /// Create a dispatcher over an existing client.
    pub fn new(client: UpstreamClient, session: Session) -> Self {
        Self {
            client,
            session,
            catalog: Catalog::standard(),
        }
    }

    /// Build the client and session from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = UpstreamClient::new(config)?;
        Ok(Self::new(client, Session::new(config.api_key.clone())))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Invoke a tool.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArguments`] when `arguments` is missing, not an
    ///   object, or fails validation
    /// - [`Error::UnknownTool`] when `name` is not in the catalog
    /// - [`Error::NotLoggedIn`] for `post_tweet` without a session
    /// - [`Error::Upstream`] when the upstream call fails (except `login`,
    ///   whose failures come back as a `success: false` payload)
    pub async fn invoke(&self, name: &str, arguments: Option<Value>) -> Result<ToolResult> {
        let arguments = match arguments {
            Some(Value::Object(map)) => map,
            None | Some(Value::Null) => return Err(Error::invalid("missing arguments object")),
            Some(_) => return Err(Error::invalid("arguments must be a JSON object")),
        };

        let operation = self
            .catalog
            .get(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;

        let args = validate_arguments(operation, &arguments)?;
        debug!(tool = operation.name, "Dispatching tool call");

        match operation.route {
            Route::Query { path } => self.query(path, &args).await,
            Route::Login { path } => self.login(path, &args).await,
            Route::Write { path } => self.write(path, &args).await,
        }
    }

    fn request(&self, request: UpstreamRequest) -> UpstreamRequest {
        request
            .api_key(self.session.api_key())
            .cookie(self.session.cookie())
    }

    async fn query(&self, path: &str, args: &ValidatedArgs) -> Result<ToolResult> {
        let request = args
            .fields
            .iter()
            .fold(UpstreamRequest::get(path), |request, (name, value)| {
                request.query(*name, value.to_query())
            });

        let response = self
            .client
            .send(self.request(request))
            .await
            .map_err(Error::upstream)?;

        Ok(ToolResult::json(&response.body)?)
    }

    async fn login(&self, path: &str, args: &ValidatedArgs) -> Result<ToolResult> {
        let request = UpstreamRequest::post(path, args.to_json_body());

        let payload = match self.client.send(self.request(request)).await {
            Ok(response) => match extract_cookie(&response.body) {
                Some(cookie) if !is_header_safe(&cookie) => {
                    warn!("Login response carried a cookie that cannot be sent as a header");
                    json!({
                        "success": false,
                        "error": "Login failed: session cookie contains characters not allowed in a header"
                    })
                }
                Some(cookie) => {
                    self.session.set_cookie(cookie);
                    info!("Login succeeded, session cookie stored");
                    json!({ "success": true, "message": "Login successful" })
                }
                None => {
                    let error = login_rejection(&response.body);
                    warn!(%error, "Login response carried no session cookie");
                    json!({ "success": false, "error": error })
                }
            },
            Err(e) => {
                let error = Error::upstream(e).to_string();
                warn!(%error, "Login failed");
                json!({ "success": false, "error": error })
            }
        };

        Ok(ToolResult::json(&payload)?)
    }

    async fn write(&self, path: &str, args: &ValidatedArgs) -> Result<ToolResult> {
        if !self.session.is_authenticated() {
            return Err(Error::NotLoggedIn);
        }

        let request = UpstreamRequest::post(path, args.to_json_body());
        let response = self
            .client
            .send(self.request(request))
            .await
            .map_err(Error::upstream)?;

        Ok(ToolResult::json(&response.body)?)
    }
}

/// Explain a 2xx login response that did not open a session.
fn login_rejection(body: &Value) -> String {
    ["msg", "message", "error"]
        .iter()
        .filter_map(|key| body.get(*key))
        .filter_map(Value::as_str)
        .find(|s| !s.trim().is_empty())
        .map(|s| format!("Login failed: {s}"))
        .unwrap_or_else(|| "Login failed: no session cookie in upstream response".to_string())
}
