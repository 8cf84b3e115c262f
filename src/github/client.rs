use crate::error::{OrgStatsError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://api.github.com/graphql";
const USER_AGENT: &str = concat!("orgstats/", env!("CARGO_PKG_VERSION"));

/// One GraphQL document plus the variables for a single page.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest {
    pub query: &'static str,
    pub variables: Value,
}

impl GraphQlRequest {
    pub fn new(query: &'static str, variables: Value) -> Self {
        Self { query, variables }
    }

    /// Convenience accessor used when logging and in scripted fetchers.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.variables.get(name).and_then(Value::as_str)
    }
}

/// Issues one page request and hands back the response's `data` object.
pub trait PageFetcher {
    fn fetch(&self, request: &GraphQlRequest) -> Result<Value>;
}

pub struct GraphQlClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    token: String,
}

impl GraphQlClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PageFetcher for GraphQlClient {
    fn fetch(&self, request: &GraphQlRequest) -> Result<Value> {
        debug!(variables = %request.variables, "POST {}", self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(OrgStatsError::remote(Some(status.as_u16()), body));
        }

        let body: Value = response
            .json()
            .map_err(|e| OrgStatsError::remote(Some(status.as_u16()), format!("unreadable body: {e}")))?;
        extract_data(body)
    }
}

/// Pull `data` out of a GraphQL envelope.
///
/// A `data` object is returned even when `errors` accompanies it, so callers can
/// tell a null `repository` (not found) from a failed query. The accompanying
/// messages are logged, since they carry the reason a node came back null
/// (FORBIDDEN, SAML enforcement).
pub fn extract_data(mut body: Value) -> Result<Value> {
    match body.get_mut("data").map(Value::take) {
        Some(data @ Value::Object(_)) => {
            if let Some(detail) = error_messages(&body) {
                warn!(errors = %detail, "GraphQL response carried errors");
            }
            Ok(data)
        }
        _ => {
            let detail = error_messages(&body).unwrap_or_else(|| format!("unexpected data: {body}"));
            Err(OrgStatsError::remote(None, detail))
        }
    }
}

/// The `errors[].message` strings of an envelope, joined with `; `.
pub fn error_messages(body: &Value) -> Option<String> {
    body.get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("; ")
        })
        .filter(|msg| !msg.is_empty())
}

/// Decode a typed page, treating shape mismatches as a malformed response.
pub fn decode<T: DeserializeOwned>(data: Value, what: &str) -> Result<T> {
    serde_json::from_value(data)
        .map_err(|e| OrgStatsError::remote(None, format!("malformed {what} page: {e}")))
}
