//! Credential sinks.
//!
//! A sink writes one named value into a consuming system. Every sink has
//! "set" semantics: writing the same value twice leaves the destination in
//! the same state.
//!
//! ## Sinks
//!
//! | kind                  | must pre-exist | client-side encryption | retry |
//! |-----------------------|----------------|------------------------|-------|
//! | `buffer`, `stdout`    | n/a            | none                   | none  |
//! | `circleci`            | no             | none                   | yes   |
//! | `travis-ci`           | no             | none                   | yes   |
//! | `github-actions`      | no             | sealed box             | yes   |
//! | `aws-param-store`     | yes            | provider-native        | none  |
//! | `aws-secrets-manager` | yes            | provider-native        | none  |
//! | `heroku`              | app must exist | none                   | none  |
//!
//! ## Adding a New Sink
//!
//! 1. Implement the `Sink` trait in a new file
//! 2. Wrap flaky remote calls in `Retry::run` if the provider warrants it
//! 3. Add a `SinkKind` variant and a config variant in `core::config`

use std::fmt;

use crate::core::{Context, KeyToName};
use crate::error::SinkError;

pub mod aws_param;
pub mod aws_secrets;
mod buffer;
mod circleci;
mod github;
mod heroku;
pub mod http;
mod stdout;
mod travis;

pub use aws_param::{AwsParamSink, ParameterApi};
pub use aws_secrets::{AwsSecretsManagerSink, SecretValueApi};
pub use buffer::{Buffer, BufferSink};
pub use circleci::CircleCiSink;
pub use github::GithubActionsSink;
pub use heroku::HerokuSink;
pub use http::HttpClient;
pub use stdout::StdoutSink;
pub use travis::TravisCiSink;

/// Sink kind, used for display and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Buffer,
    Stdout,
    CircleCi,
    TravisCi,
    GithubActions,
    AwsParamStore,
    AwsSecretsManager,
    Heroku,
}

impl SinkKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Buffer => "buffer",
            Self::Stdout => "stdout",
            Self::CircleCi => "circleci",
            Self::TravisCi => "travis-ci",
            Self::GithubActions => "github-actions",
            Self::AwsParamStore => "aws-param-store",
            Self::AwsSecretsManager => "aws-secrets-manager",
            Self::Heroku => "heroku",
        }
    }
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A consumer system that must hold the current credential value.
pub trait Sink {
    /// Write `value` under `name` in the destination.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` when the write failed after any retry budget was
    /// spent, or when the destination must pre-exist and does not.
    fn write(&self, ctx: &Context, name: &str, value: &str) -> Result<(), SinkError>;

    /// Static mapping from credential key to destination name. No I/O.
    fn key_to_name(&self) -> &KeyToName;

    fn kind(&self) -> SinkKind;
}
