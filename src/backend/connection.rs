//! Backend connection management
//!
//! One HTTP client shared by the auth API and the row API. Requests carry the
//! project key and, once someone signs in, their access token.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::BackendConfig;
use crate::utils::errors::{BackendError, BackendResult, Result};

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
    anon_key: String,
    access_token: Arc<RwLock<Option<String>>>,
}

impl BackendClient {
    /// Build the shared HTTP client from configuration
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = url::Url::parse(&config.url)?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("EventHub/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::debug!(url = %base_url, "Backend client created");

        Ok(Self {
            http,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_access_token(&self, token: Option<String>) {
        *self.access_token.write() = token;
    }

    pub fn has_access_token(&self) -> bool {
        self.access_token.read().is_some()
    }

    /// Request against a table of the row API
    pub fn rest(&self, method: Method, table: &str) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        self.authorize(self.http.request(method, url))
    }

    /// Request against the auth API
    pub fn auth(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/auth/v1/{}", self.base_url, path);
        self.authorize(self.http.request(method, url))
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let bearer = self
            .access_token
            .read()
            .clone()
            .unwrap_or_else(|| self.anon_key.clone());

        builder.header("apikey", &self.anon_key).bearer_auth(bearer)
    }

    /// Check whether the auth API answers
    pub async fn health_check(&self) -> Result<bool> {
        let response = self
            .auth(Method::GET, "health")
            .send()
            .await
            .map_err(transport_error)?;

        Ok(response.status().is_success())
    }
}

/// Send a request, turning non-2xx answers into [`BackendError::Api`]
pub async fn send(builder: RequestBuilder) -> BackendResult<Response> {
    let response = builder.send().await.map_err(transport_error)?;

    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(error_from_body(status, &body))
}

/// Send a request and decode its JSON body
pub async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> BackendResult<T> {
    let response = send(builder).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::InvalidResponse(e.to_string()))
}

fn transport_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        BackendError::Timeout
    } else if err.is_connect() {
        BackendError::Unavailable
    } else {
        BackendError::RequestFailed(err.to_string())
    }
}

/// Row API errors look like `{code, message}`, auth API errors like
/// `{error, error_description}` or `{code, msg}`.
pub(crate) fn error_from_body(status: u16, body: &str) -> BackendError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let code = parsed.as_ref().and_then(|v| match v.get("code")? {
        Value::String(code) => Some(code.clone()),
        Value::Number(code) => Some(code.to_string()),
        _ => None,
    });

    let message = parsed
        .as_ref()
        .and_then(|v| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str))
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP status {}", status)
            } else {
                body.trim().to_string()
            }
        });

    BackendError::Api { status, code, message }
}
