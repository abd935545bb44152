//! Heroku app config var sink.
//!
//! Reads the app's config vars first so a missing app fails with "not found"
//! instead of a generic update error, then patches the one variable.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info};

use super::http::HttpClient;
use super::{Sink, SinkKind};
use crate::core::{Context, KeyToName};
use crate::error::SinkError;

const ACCEPT_V3: &str = "application/vnd.heroku+json; version=3";

#[derive(Debug)]
pub struct HerokuSink {
    key_to_name: KeyToName,
    client: HttpClient,
    app: String,
}

impl HerokuSink {
    pub fn new(
        key_to_name: KeyToName,
        base_url: &str,
        token: &str,
        app: &str,
    ) -> Result<Self, SinkError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_V3));

        Ok(Self {
            key_to_name,
            client: HttpClient::with_auth(base_url, "Bearer", token, headers)?,
            app: app.to_string(),
        })
    }

    fn config_vars_path(&self) -> String {
        format!("/apps/{}/config-vars", self.app)
    }
}

impl Sink for HerokuSink {
    fn write(&self, ctx: &Context, name: &str, value: &str) -> Result<(), SinkError> {
        let existing: BTreeMap<String, Value> = self.client.fetch(
            &format!("heroku app {}", self.app),
            self.client.request(ctx, Method::GET, &self.config_vars_path()),
        )?;
        debug!(
            app = %self.app,
            vars = existing.len(),
            present = existing.contains_key(name),
            "listed heroku config vars"
        );

        let mut update = BTreeMap::new();
        update.insert(name, value);
        self.client.execute(
            &format!("unable to update config var {} for heroku app {}", name, self.app),
            self.client
                .request(ctx, Method::PATCH, &self.config_vars_path())
                .json(&update),
        )?;

        info!(app = %self.app, var = %name, "wrote heroku config var");
        Ok(())
    }

    fn key_to_name(&self) -> &KeyToName {
        &self.key_to_name
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Heroku
    }
}
