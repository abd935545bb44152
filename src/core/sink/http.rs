//! Blocking HTTP client shared by the REST-backed sinks.
//!
//! Wraps an async `reqwest::Client` and a private runtime. The run context's
//! remaining time, if any, becomes the request timeout.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::constants::USER_AGENT;
use crate::core::runtime::Blocking;
use crate::core::Context;
use crate::error::SinkError;

#[derive(Debug)]
pub struct HttpClient {
    rt: Blocking,
    client: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// Build a client that sends `headers` with every request.
    pub fn new(base_url: impl Into<String>, headers: HeaderMap) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| SinkError::Request {
                context: "unable to build http client".to_string(),
                source: e,
            })?;
        Ok(Self {
            rt: Blocking::new()?,
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Client authenticating with `Authorization: <scheme> <token>`.
    pub fn with_auth(
        base_url: impl Into<String>,
        scheme: &str,
        token: &str,
        mut headers: HeaderMap,
    ) -> Result<Self, SinkError> {
        let mut value = HeaderValue::from_str(&format!("{} {}", scheme, token))
            .map_err(|_| SinkError::Provider {
                context: "unable to build http client".to_string(),
                message: "token contains invalid header characters".to_string(),
            })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Self::new(base_url, headers)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a request to `base_url + path`.
    pub fn request(&self, ctx: &Context, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "http request");
        let builder = self.client.request(method, url);
        match ctx.remaining() {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    /// Send and check the status, discarding the body.
    pub fn execute(&self, what: &str, builder: RequestBuilder) -> Result<(), SinkError> {
        self.rt.block_on(async {
            let resp = builder.send().await.map_err(|e| request_error(what, e))?;
            check_status(what, resp.status())
        })
    }

    /// Send, check the status and decode a JSON body.
    pub fn fetch<T: DeserializeOwned>(
        &self,
        what: &str,
        builder: RequestBuilder,
    ) -> Result<T, SinkError> {
        self.rt.block_on(async {
            let resp = builder.send().await.map_err(|e| request_error(what, e))?;
            check_status(what, resp.status())?;
            resp.json::<T>().await.map_err(|e| request_error(what, e))
        })
    }
}

fn request_error(what: &str, source: reqwest::Error) -> SinkError {
    SinkError::Request {
        context: what.to_string(),
        source,
    }
}

fn check_status(what: &str, status: StatusCode) -> Result<(), SinkError> {
    if status == StatusCode::NOT_FOUND {
        return Err(SinkError::NotFound(what.to_string()));
    }
    if !status.is_success() {
        return Err(SinkError::Status {
            context: what.to_string(),
            status,
        });
    }
    Ok(())
}
