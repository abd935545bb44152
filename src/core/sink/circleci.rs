//! CircleCI project environment variable sink.
//!
//! `POST /api/v2/project/{vcs}/{account}/{repo}/envvar` creates the variable
//! or replaces its value.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::Serialize;
use tracing::info;

use super::http::HttpClient;
use super::{Sink, SinkKind};
use crate::core::retry::Retry;
use crate::core::{Context, KeyToName};
use crate::error::SinkError;

#[derive(Serialize)]
struct EnvVar<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Debug)]
pub struct CircleCiSink {
    key_to_name: KeyToName,
    client: HttpClient,
    project_slug: String,
    retry: Retry,
}

impl CircleCiSink {
    /// `vcs` is the project slug prefix, e.g. `gh` or `bb`.
    pub fn new(
        key_to_name: KeyToName,
        base_url: &str,
        token: &str,
        vcs: &str,
        account: &str,
        repo: &str,
    ) -> Result<Self, SinkError> {
        let mut headers = HeaderMap::new();
        let mut token = HeaderValue::from_str(token).map_err(|_| SinkError::Provider {
            context: "unable to build circleci client".to_string(),
            message: "token contains invalid header characters".to_string(),
        })?;
        token.set_sensitive(true);
        headers.insert("Circle-Token", token);

        Ok(Self {
            key_to_name,
            client: HttpClient::new(base_url, headers)?,
            project_slug: format!("{}/{}/{}", vcs, account, repo),
            retry: Retry::default(),
        })
    }

    pub fn with_retry(mut self, retry: Retry) -> Self {
        self.retry = retry;
        self
    }
}

impl Sink for CircleCiSink {
    fn write(&self, ctx: &Context, name: &str, value: &str) -> Result<(), SinkError> {
        let path = format!("/api/v2/project/{}/envvar", self.project_slug);
        let what = format!("could not write {} to {}", name, self.project_slug);

        self.retry.run(ctx, || {
            let req = self
                .client
                .request(ctx, Method::POST, &path)
                .json(&EnvVar { name, value });
            self.client.execute(&what, req)
        })?;

        info!(project = %self.project_slug, var = %name, "wrote circleci env var");
        Ok(())
    }

    fn key_to_name(&self) -> &KeyToName {
        &self.key_to_name
    }

    fn kind(&self) -> SinkKind {
        SinkKind::CircleCi
    }
}
