//! Configuration file management.
//!
//! Parses `rotator.toml`, validates it, and builds the rotation jobs it
//! describes. Provider tokens come from the environment and are only read
//! when jobs are built, so `plan` works without them.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::core::constants;
use crate::core::sink::{
    BufferSink, CircleCiSink, GithubActionsSink, HerokuSink, Sink, SinkKind, StdoutSink,
    TravisCiSink,
};
use crate::core::source::{Dummy, Env, Source, SourceKind};
use crate::core::{KeyToName, RotationJob};
use crate::error::{ConfigError, Result};

/// Parsed `rotator.toml`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub secrets: Vec<SecretConfig>,
}

fn default_version() -> u32 {
    constants::CONFIG_VERSION
}

/// One `[[secrets]]` entry: a source and the sinks it feeds.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretConfig {
    pub name: String,
    pub source: SourceConfig,
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SourceConfig {
    AwsIam {
        username: String,
        #[serde(default)]
        role_arn: Option<String>,
        #[serde(default)]
        external_id: Option<String>,
        #[serde(default)]
        region: Option<String>,
        #[serde(default = "default_max_age", with = "humantime_serde")]
        max_age: Duration,
    },
    Env {
        name: String,
    },
    Dummy,
}

fn default_max_age() -> Duration {
    constants::DEFAULT_MAX_AGE
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SinkConfig {
    Buffer {
        key_to_name: KeyToName,
    },
    Stdout {
        key_to_name: KeyToName,
    },
    #[serde(rename = "circleci")]
    CircleCi {
        key_to_name: KeyToName,
        #[serde(default = "default_vcs")]
        vcs: String,
        account: String,
        repo: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    TravisCi {
        key_to_name: KeyToName,
        repo_slug: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    GithubActions {
        key_to_name: KeyToName,
        owner: String,
        repo: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    AwsParamStore {
        key_to_name: KeyToName,
        #[serde(default)]
        role_arn: Option<String>,
        #[serde(default)]
        external_id: Option<String>,
        region: String,
    },
    AwsSecretsManager {
        key_to_name: KeyToName,
        #[serde(default)]
        role_arn: Option<String>,
        #[serde(default)]
        external_id: Option<String>,
        region: String,
    },
    Heroku {
        key_to_name: KeyToName,
        app: String,
        #[serde(default)]
        base_url: Option<String>,
    },
}

fn default_vcs() -> String {
    "gh".to_string()
}

impl SourceConfig {
    pub fn kind(&self) -> SourceKind {
        match self {
            Self::AwsIam { .. } => SourceKind::AwsIam,
            Self::Env { .. } => SourceKind::Env,
            Self::Dummy => SourceKind::Dummy,
        }
    }

    /// Construct the source, connecting provider clients.
    pub fn build(&self) -> std::result::Result<Box<dyn Source>, ConfigError> {
        match self {
            Self::Dummy => Ok(Box::new(Dummy)),
            Self::Env { name } => Ok(Box::new(Env::new(name.clone()))),
            Self::AwsIam {
                username,
                role_arn,
                external_id,
                region,
                max_age,
            } => build_iam(
                username,
                AwsSettings {
                    role_arn,
                    external_id,
                    region: region.as_deref(),
                },
                *max_age,
            ),
        }
    }
}

impl SinkConfig {
    pub fn kind(&self) -> SinkKind {
        match self {
            Self::Buffer { .. } => SinkKind::Buffer,
            Self::Stdout { .. } => SinkKind::Stdout,
            Self::CircleCi { .. } => SinkKind::CircleCi,
            Self::TravisCi { .. } => SinkKind::TravisCi,
            Self::GithubActions { .. } => SinkKind::GithubActions,
            Self::AwsParamStore { .. } => SinkKind::AwsParamStore,
            Self::AwsSecretsManager { .. } => SinkKind::AwsSecretsManager,
            Self::Heroku { .. } => SinkKind::Heroku,
        }
    }

    pub fn key_to_name(&self) -> &KeyToName {
        match self {
            Self::Buffer { key_to_name }
            | Self::Stdout { key_to_name }
            | Self::CircleCi { key_to_name, .. }
            | Self::TravisCi { key_to_name, .. }
            | Self::GithubActions { key_to_name, .. }
            | Self::AwsParamStore { key_to_name, .. }
            | Self::AwsSecretsManager { key_to_name, .. }
            | Self::Heroku { key_to_name, .. } => key_to_name,
        }
    }

    /// Construct the sink, reading its provider token from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnv` if the token variable is unset, or
    /// `ConfigError::Client` if the provider client cannot be built.
    pub fn build(&self) -> std::result::Result<Box<dyn Sink>, ConfigError> {
        let key_to_name = self.key_to_name().clone();
        let kind = self.kind().name();
        let client_err = |e: crate::error::SinkError| ConfigError::Client {
            kind,
            message: e.to_string(),
        };

        let sink: Box<dyn Sink> = match self {
            Self::Buffer { .. } => Box::new(BufferSink::new(key_to_name)),
            Self::Stdout { .. } => Box::new(StdoutSink::new(key_to_name)),
            Self::CircleCi {
                vcs,
                account,
                repo,
                base_url,
                ..
            } => {
                let token = token(constants::ENV_CIRCLECI_TOKEN)?;
                let base_url = base_url.as_deref().unwrap_or(constants::CIRCLECI_BASE_URL);
                Box::new(
                    CircleCiSink::new(key_to_name, base_url, &token, vcs, account, repo)
                        .map_err(client_err)?,
                )
            }
            Self::TravisCi {
                repo_slug,
                base_url,
                ..
            } => {
                let token = token(constants::ENV_TRAVIS_TOKEN)?;
                let base_url = base_url.as_deref().unwrap_or(constants::TRAVIS_BASE_URL);
                Box::new(
                    TravisCiSink::new(key_to_name, base_url, &token, repo_slug)
                        .map_err(client_err)?,
                )
            }
            Self::GithubActions {
                owner,
                repo,
                base_url,
                ..
            } => {
                let token = token(constants::ENV_GITHUB_TOKEN)?;
                let base_url = base_url.as_deref().unwrap_or(constants::GITHUB_BASE_URL);
                Box::new(
                    GithubActionsSink::new(key_to_name, base_url, &token, owner, repo)
                        .map_err(client_err)?,
                )
            }
            Self::Heroku { app, base_url, .. } => {
                let token = token(constants::ENV_HEROKU_TOKEN)?;
                let base_url = base_url.as_deref().unwrap_or(constants::HEROKU_BASE_URL);
                Box::new(HerokuSink::new(key_to_name, base_url, &token, app).map_err(client_err)?)
            }
            Self::AwsParamStore {
                role_arn,
                external_id,
                region,
                ..
            } => build_param_store(
                key_to_name,
                AwsSettings {
                    role_arn,
                    external_id,
                    region: Some(region),
                },
            )?,
            Self::AwsSecretsManager {
                role_arn,
                external_id,
                region,
                ..
            } => build_secrets_manager(
                key_to_name,
                AwsSettings {
                    role_arn,
                    external_id,
                    region: Some(region),
                },
            )?,
        };
        Ok(sink)
    }
}

fn token(var: &'static str) -> std::result::Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingEnv(var))
}

/// Role, external id and region shared by every AWS-backed kind.
#[cfg_attr(not(feature = "aws"), allow(dead_code))]
struct AwsSettings<'a> {
    role_arn: &'a Option<String>,
    external_id: &'a Option<String>,
    region: Option<&'a str>,
}

#[cfg(feature = "aws")]
impl AwsSettings<'_> {
    fn target(&self) -> crate::core::aws::AwsTarget {
        crate::core::aws::AwsTarget {
            role_arn: self.role_arn.clone(),
            external_id: self.external_id.clone(),
            region: self.region.map(str::to_string),
        }
    }
}

#[cfg(feature = "aws")]
fn build_iam(
    username: &str,
    aws: AwsSettings<'_>,
    max_age: Duration,
) -> std::result::Result<Box<dyn Source>, ConfigError> {
    use crate::core::source::aws_iam::AwsIam;
    use crate::core::source::IamKeySource;

    let api = AwsIam::connect(&aws.target()).map_err(|e| ConfigError::Client {
        kind: SourceKind::AwsIam.name(),
        message: e.to_string(),
    })?;
    Ok(Box::new(
        IamKeySource::new(username, Box::new(api)).with_max_age(max_age),
    ))
}

#[cfg(feature = "aws")]
fn build_param_store(
    key_to_name: KeyToName,
    aws: AwsSettings<'_>,
) -> std::result::Result<Box<dyn Sink>, ConfigError> {
    use crate::core::sink::aws_param::AwsSsm;
    use crate::core::sink::AwsParamSink;

    let api = AwsSsm::connect(&aws.target()).map_err(|e| ConfigError::Client {
        kind: SinkKind::AwsParamStore.name(),
        message: e.to_string(),
    })?;
    Ok(Box::new(AwsParamSink::new(key_to_name, Box::new(api))))
}

#[cfg(feature = "aws")]
fn build_secrets_manager(
    key_to_name: KeyToName,
    aws: AwsSettings<'_>,
) -> std::result::Result<Box<dyn Sink>, ConfigError> {
    use crate::core::sink::aws_secrets::AwsSecretsManager;
    use crate::core::sink::AwsSecretsManagerSink;

    let api = AwsSecretsManager::connect(&aws.target()).map_err(|e| ConfigError::Client {
        kind: SinkKind::AwsSecretsManager.name(),
        message: e.to_string(),
    })?;
    Ok(Box::new(AwsSecretsManagerSink::new(key_to_name, Box::new(api))))
}

#[cfg(not(feature = "aws"))]
fn build_iam(
    _: &str,
    _: AwsSettings<'_>,
    _: Duration,
) -> std::result::Result<Box<dyn Source>, ConfigError> {
    Err(feature_disabled(SourceKind::AwsIam.name()))
}

#[cfg(not(feature = "aws"))]
fn build_param_store(
    _: KeyToName,
    _: AwsSettings<'_>,
) -> std::result::Result<Box<dyn Sink>, ConfigError> {
    Err(feature_disabled(SinkKind::AwsParamStore.name()))
}

#[cfg(not(feature = "aws"))]
fn build_secrets_manager(
    _: KeyToName,
    _: AwsSettings<'_>,
) -> std::result::Result<Box<dyn Sink>, ConfigError> {
    Err(feature_disabled(SinkKind::AwsSecretsManager.name()))
}

#[cfg(not(feature = "aws"))]
fn feature_disabled(kind: &'static str) -> ConfigError {
    ConfigError::FeatureDisabled {
        kind,
        feature: "aws",
    }
}

impl Config {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` if the file can't be read,
    /// `ConfigError::Parse` on malformed TOML or an unknown kind, or a
    /// validation error.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::parse(&contents)?;

        debug!(secrets = config.secrets.len(), "config loaded");
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration structure.
    ///
    /// Checks:
    /// - `version` is one this build understands
    /// - Every secret has a name and at least one sink
    /// - Every sink has a non-empty `key_to_name` with non-empty names
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnsupportedVersion` or
    /// `ConfigError::MissingField` on the first violation.
    pub fn validate(&self) -> Result<()> {
        debug!("validating config");

        if self.version != constants::CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
                expected: constants::CONFIG_VERSION,
            }
            .into());
        }

        for secret in &self.secrets {
            let missing = |field| ConfigError::MissingField {
                secret: secret.name.clone(),
                field,
            };

            if secret.name.trim().is_empty() {
                return Err(missing("name").into());
            }
            if secret.sinks.is_empty() {
                return Err(missing("sinks").into());
            }
            for sink in &secret.sinks {
                let key_to_name = sink.key_to_name();
                if key_to_name.is_empty() {
                    return Err(missing("key_to_name").into());
                }
                if key_to_name.values().any(|name| name.trim().is_empty()) {
                    return Err(missing("key_to_name value").into());
                }
            }
        }

        Ok(())
    }

    /// Build one rotation job per secret, in file order.
    ///
    /// # Errors
    ///
    /// Fails on the first source or sink that cannot be constructed.
    pub fn build_jobs(&self) -> Result<Vec<RotationJob>> {
        let mut jobs = Vec::with_capacity(self.secrets.len());
        for secret in &self.secrets {
            let mut job = RotationJob::new(secret.name.clone(), secret.source.build()?);
            for sink in &secret.sinks {
                job = job.with_sink(sink.build()?);
            }
            debug!(job = %job.name, sinks = job.sinks.len(), "built job");
            jobs.push(job);
        }
        Ok(jobs)
    }
}
