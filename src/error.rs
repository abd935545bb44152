//! Error types.
//!
//! Sources and sinks each have their own error enum. The orchestrator never
//! returns those directly: it tags every failure with the job (and sink kind
//! or credential key where it applies) and hands back one [`RotationErrors`]
//! aggregate. The CLI wraps everything in [`Error`].

use std::fmt;

use thiserror::Error;

use crate::core::sink::SinkKind;
use crate::core::source::SourceKind;

/// Top-level error returned by CLI commands.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Rotation(#[from] RotationErrors),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A source could not produce a value this cycle.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("{operation}: {message}")]
    Provider {
        operation: &'static str,
        message: String,
    },

    #[error("environment variable {0} not present")]
    MissingEnv(String),

    #[error("user {user} has {count} access keys, expected at most 2")]
    TooManyKeys { user: String, count: usize },
}

impl SourceError {
    /// Wrap a provider failure with the operation that was attempted.
    pub fn provider(operation: &'static str, err: impl fmt::Display) -> Self {
        Self::Provider {
            operation,
            message: err.to_string(),
        }
    }
}

/// A sink could not publish a value.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("{context}: {source}")]
    Request {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context}: invalid http status {status}")]
    Status {
        context: String,
        status: reqwest::StatusCode,
    },

    #[error("{0} does not exist")]
    NotFound(String),

    #[error("{context}: {message}")]
    Provider { context: String, message: String },

    #[error("unable to encrypt secret {0}")]
    Encryption(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration loading and job construction errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing env var: {0}")]
    MissingEnv(&'static str),

    #[error("unsupported config version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("{secret}: missing {field}")]
    MissingField { secret: String, field: &'static str },

    #[error("{kind} support not compiled. Rebuild with: cargo install rotator --features {feature}")]
    FeatureDisabled {
        kind: &'static str,
        feature: &'static str,
    },

    #[error("unable to set up {kind} client: {message}")]
    Client { kind: &'static str, message: String },
}

/// One recorded failure from a rotation run.
#[derive(Error, Debug)]
pub enum Failure {
    #[error("{job}: unable to rotate secret at {kind}: {source}")]
    Source {
        job: String,
        kind: SourceKind,
        #[source]
        source: SourceError,
    },

    #[error("{job}: missing value in key_to_name for {sink} sink")]
    MissingMapping { job: String, sink: SinkKind },

    #[error("{job}: no name specified for credential with key {key} for {sink} sink")]
    MissingName {
        job: String,
        key: String,
        sink: SinkKind,
    },

    #[error("{job}: unable to write {key} to {sink} sink: {source}")]
    Sink {
        job: String,
        key: String,
        sink: SinkKind,
        #[source]
        source: SinkError,
    },

    #[error("{job}: rotation cancelled before completion")]
    Cancelled { job: String },
}

impl Failure {
    /// Name of the job the failure belongs to.
    pub fn job(&self) -> &str {
        match self {
            Self::Source { job, .. }
            | Self::MissingMapping { job, .. }
            | Self::MissingName { job, .. }
            | Self::Sink { job, .. }
            | Self::Cancelled { job } => job,
        }
    }
}

/// Aggregate of every failure recorded during one run.
///
/// Never constructed empty by the orchestrator: a run with no failures
/// returns `Ok(())`.
#[derive(Debug, Default)]
pub struct RotationErrors {
    failures: Vec<Failure>,
}

impl RotationErrors {
    pub fn push(&mut self, failure: Failure) {
        self.failures.push(failure);
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// `Ok(())` if nothing was recorded, the aggregate otherwise.
    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for RotationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.failures.len() == 1 {
            "error"
        } else {
            "errors"
        };
        write!(f, "{} {} occurred:", self.failures.len(), noun)?;
        for failure in &self.failures {
            write!(f, "\n\t* {}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for RotationErrors {}

impl<'a> IntoIterator for &'a RotationErrors {
    type Item = &'a Failure;
    type IntoIter = std::slice::Iter<'a, Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_aggregate_is_ok() {
        assert!(RotationErrors::default().into_result().is_ok());
    }

    #[test]
    fn test_aggregate_display_lists_every_failure() {
        let mut errs = RotationErrors::default();
        errs.push(Failure::MissingMapping {
            job: "a".to_string(),
            sink: SinkKind::Buffer,
        });
        errs.push(Failure::Cancelled {
            job: "b".to_string(),
        });

        let msg = errs.to_string();
        assert!(msg.starts_with("2 errors occurred:"));
        assert!(msg.contains("a: missing value in key_to_name for buffer sink"));
        assert!(msg.contains("b: rotation cancelled"));
    }

    #[test]
    fn test_failure_job() {
        let failure = Failure::MissingName {
            job: "svc".to_string(),
            key: "secret".to_string(),
            sink: SinkKind::Stdout,
        };
        assert_eq!(failure.job(), "svc");
    }
}
