use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::error::{status_message, ApiError};
use super::query::{build_query_string, QueryParams};
use super::FailureSink;
use crate::config::ApiConfig;

const JSON: &str = "application/json";

/// Per-call overrides. Headers set here replace the JSON defaults key by key.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_string(body).map_err(ApiError::Encode)?);
        Ok(self)
    }
}

/// Client for one API base URL.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    failures: Arc<dyn FailureSink>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, failures: Arc<dyn FailureSink>) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_http_client(http, config.base_url.clone(), failures))
    }

    pub fn with_http_client(
        http: Client,
        base_url: impl Into<String>,
        failures: Arc<dyn FailureSink>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            failures,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `options` to `base_url + endpoint` and decodes the JSON answer.
    ///
    /// A 204 answer decodes `T` from an empty JSON object. Any non-success status is
    /// reported to the failure sink as `API Error (<status>): <reason>. <body>` and
    /// returned as [`ApiError::Status`] carrying the same text. Transport failures are
    /// returned without being reported.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let target = format!("{}{}", self.base_url, endpoint);
        let url = Url::parse(&target).map_err(|source| ApiError::InvalidTarget {
            target: target.clone(),
            source,
        })?;

        let RequestOptions {
            method,
            headers,
            body,
        } = options;

        debug!(%method, %target, "sending request");
        let mut builder = self
            .http
            .request(method.clone(), url)
            .headers(merge_headers(headers));
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(ApiError::Transport)?;
        let status = response.status();
        debug!(%method, %target, %status, headers = ?response.headers(), "received response");

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    warn!(%status, error = %err, "unable to read error response body");
                    String::new()
                }
            };
            let message = status_message(status, &body);
            self.failures.on_request_failure(&message);
            return Err(ApiError::Status { status, message });
        }

        if status == StatusCode::NO_CONTENT {
            return empty_object();
        }

        let bytes = response.bytes().await.map_err(ApiError::Body)?;
        serde_json::from_slice(&bytes).map_err(ApiError::Decode)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Option<&QueryParams>,
    ) -> Result<T, ApiError> {
        let query = params
            .map(|params| {
                build_query_string(
                    params
                        .iter()
                        .map(|(key, value)| (key.as_str(), value.as_deref())),
                )
            })
            .unwrap_or_default();
        self.request(&format!("{endpoint}{query}"), RequestOptions::new(Method::GET))
            .await
    }

    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let options = RequestOptions::new(Method::POST).with_json(body)?;
        self.request(endpoint, options).await
    }

    pub async fn patch<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let options = RequestOptions::new(Method::PATCH).with_json(body)?;
        self.request(endpoint, options).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(endpoint, RequestOptions::new(Method::DELETE))
            .await
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn merge_headers(custom: HeaderMap) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
    headers.insert(ACCEPT, HeaderValue::from_static(JSON));
    headers.extend(custom);
    headers
}

fn empty_object<T: DeserializeOwned>() -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(Map::new())).map_err(ApiError::Decode)
}
