//! GitHub Actions repository secret sink.
//!
//! GitHub only accepts secrets encrypted to the repository's public key, so
//! each attempt fetches the key, seals the value as a libsodium sealed box
//! and `PUT`s the ciphertext. The whole attempt is retried, so a key
//! rotated between fetch and put is picked up on the next try.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use crypto_box::aead::OsRng;
use crypto_box::{PublicKey, KEY_SIZE};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::http::HttpClient;
use super::{Sink, SinkKind};
use crate::core::retry::Retry;
use crate::core::{Context, KeyToName};
use crate::error::SinkError;

#[derive(Debug, Deserialize)]
struct RepoPublicKey {
    key_id: String,
    key: String,
}

#[derive(Serialize)]
struct EncryptedSecret<'a> {
    encrypted_value: String,
    key_id: &'a str,
}

#[derive(Debug)]
pub struct GithubActionsSink {
    key_to_name: KeyToName,
    client: HttpClient,
    owner: String,
    repo: String,
    retry: Retry,
}

impl GithubActionsSink {
    pub fn new(
        key_to_name: KeyToName,
        base_url: &str,
        token: &str,
        owner: &str,
        repo: &str,
    ) -> Result<Self, SinkError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        Ok(Self {
            key_to_name,
            client: HttpClient::with_auth(base_url, "Bearer", token, headers)?,
            owner: owner.to_string(),
            repo: repo.to_string(),
            retry: Retry::default(),
        })
    }

    pub fn with_retry(mut self, retry: Retry) -> Self {
        self.retry = retry;
        self
    }

    fn repo_path(&self) -> String {
        format!("/repos/{}/{}/actions/secrets", self.owner, self.repo)
    }

    fn write_once(&self, ctx: &Context, name: &str, value: &str) -> Result<(), SinkError> {
        let public_key: RepoPublicKey = self.client.fetch(
            &format!(
                "unable to get public key in Github for repo {}/{}",
                self.owner, self.repo
            ),
            self.client
                .request(ctx, Method::GET, &format!("{}/public-key", self.repo_path())),
        )?;
        debug!(key_id = %public_key.key_id, "fetched repository public key");

        let sealed = seal(&public_key.key, name, value)?;

        self.client.execute(
            &format!(
                "unable to create or update secret {} in Github for repo {}/{}",
                name, self.owner, self.repo
            ),
            self.client
                .request(ctx, Method::PUT, &format!("{}/{}", self.repo_path(), name))
                .json(&EncryptedSecret {
                    encrypted_value: sealed,
                    key_id: &public_key.key_id,
                }),
        )
    }
}

/// Seal `value` to a base64-encoded X25519 public key, returning base64.
fn seal(encoded_key: &str, name: &str, value: &str) -> Result<String, SinkError> {
    let decoded = STANDARD
        .decode(encoded_key)
        .map_err(|e| SinkError::InvalidPublicKey(format!("not base64: {}", e)))?;
    let bytes: [u8; KEY_SIZE] = decoded.as_slice().try_into().map_err(|_| {
        SinkError::InvalidPublicKey(format!(
            "length {} is not expected length {}",
            decoded.len(),
            KEY_SIZE
        ))
    })?;

    let sealed = PublicKey::from(bytes)
        .seal(&mut OsRng, value.as_bytes())
        .map_err(|_| SinkError::Encryption(name.to_string()))?;
    Ok(STANDARD.encode(sealed))
}

impl Sink for GithubActionsSink {
    fn write(&self, ctx: &Context, name: &str, value: &str) -> Result<(), SinkError> {
        self.retry.run(ctx, || self.write_once(ctx, name, value))?;
        info!(owner = %self.owner, repo = %self.repo, var = %name, "wrote github actions secret");
        Ok(())
    }

    fn key_to_name(&self) -> &KeyToName {
        &self.key_to_name
    }

    fn kind(&self) -> SinkKind {
        SinkKind::GithubActions
    }
}
