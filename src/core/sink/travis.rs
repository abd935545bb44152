//! Travis CI repository environment variable sink.
//!
//! Lists the repository's variables, then updates the matching one in place
//! (keeping its `public` flag) or creates a private one.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::http::HttpClient;
use super::{Sink, SinkKind};
use crate::core::retry::Retry;
use crate::core::{Context, KeyToName};
use crate::error::SinkError;

const API_VERSION: &str = "3";

#[derive(Debug, Deserialize)]
struct EnvVarList {
    env_vars: Vec<EnvVar>,
}

#[derive(Debug, Deserialize)]
struct EnvVar {
    id: String,
    name: String,
    #[serde(default)]
    public: bool,
}

#[derive(Serialize)]
struct EnvVarBody<'a> {
    #[serde(rename = "env_var.name")]
    name: &'a str,
    #[serde(rename = "env_var.value")]
    value: &'a str,
    #[serde(rename = "env_var.public")]
    public: bool,
}

#[derive(Debug)]
pub struct TravisCiSink {
    key_to_name: KeyToName,
    client: HttpClient,
    repo_slug: String,
    retry: Retry,
}

impl TravisCiSink {
    pub fn new(
        key_to_name: KeyToName,
        base_url: &str,
        token: &str,
        repo_slug: &str,
    ) -> Result<Self, SinkError> {
        let mut headers = HeaderMap::new();
        headers.insert("Travis-API-Version", HeaderValue::from_static(API_VERSION));

        Ok(Self {
            key_to_name,
            client: HttpClient::with_auth(base_url, "token", token, headers)?,
            repo_slug: repo_slug.to_string(),
            retry: Retry::default(),
        })
    }

    pub fn with_retry(mut self, retry: Retry) -> Self {
        self.retry = retry;
        self
    }

    fn encoded_slug(&self) -> String {
        self.repo_slug.replace('/', "%2F")
    }

    fn write_once(&self, ctx: &Context, name: &str, value: &str) -> Result<(), SinkError> {
        let slug = self.encoded_slug();

        let list: EnvVarList = self.client.fetch(
            &format!("unable to list env vars in Travis CI for repo {}", self.repo_slug),
            self.client
                .request(ctx, Method::GET, &format!("/repo/{}/env_vars", slug)),
        )?;

        let existing = list.env_vars.into_iter().find(|e| e.name == name);
        let what = format!(
            "unable to write env var {} in Travis CI for repo {}",
            name, self.repo_slug
        );

        let req = match &existing {
            Some(env_var) => {
                debug!(id = %env_var.id, var = %name, "updating existing travis env var");
                self.client
                    .request(
                        ctx,
                        Method::PATCH,
                        &format!("/repo/{}/env_var/{}", slug, env_var.id),
                    )
                    .json(&EnvVarBody {
                        name,
                        value,
                        public: env_var.public,
                    })
            }
            None => {
                debug!(var = %name, "creating travis env var");
                self.client
                    .request(ctx, Method::POST, &format!("/repo/{}/env_vars", slug))
                    .json(&EnvVarBody {
                        name,
                        value,
                        public: false,
                    })
            }
        };
        self.client.execute(&what, req)
    }
}

impl Sink for TravisCiSink {
    fn write(&self, ctx: &Context, name: &str, value: &str) -> Result<(), SinkError> {
        self.retry.run(ctx, || self.write_once(ctx, name, value))?;
        info!(repo = %self.repo_slug, var = %name, "wrote travis env var");
        Ok(())
    }

    fn key_to_name(&self) -> &KeyToName {
        &self.key_to_name
    }

    fn kind(&self) -> SinkKind {
        SinkKind::TravisCi
    }
}
