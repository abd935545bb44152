//! Credential sources.
//!
//! A source answers one question: "do you have a fresh value for me?"
//! Stateful sources rotate the credential upstream as part of answering.
//!
//! ## Sources
//!
//! - **aws-iam**: two-key IAM access key rotation with a grace window.
//!   Provider calls need the `aws` feature; the policy itself is always
//!   compiled.
//! - **env**: reads one environment variable.
//! - **dummy**: random alphanumeric value, for testing pipelines.
//!
//! ## Adding a New Source
//!
//! 1. Implement the `Source` trait in a new file
//! 2. Add a `SourceKind` variant
//! 3. Add a config variant in `core::config` that builds it

use std::fmt;

use crate::core::{Context, CredentialSet};
use crate::error::SourceError;

pub mod aws_iam;
mod dummy;
mod env;

pub use aws_iam::{AccessKey, AccessKeyApi, AccessKeyMetadata, IamKeySource, RotationPlan};
pub use dummy::Dummy;
pub use env::Env;

/// Source kind, used for display and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    AwsIam,
    Env,
    Dummy,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AwsIam => "aws-iam",
            Self::Env => "env",
            Self::Dummy => "dummy",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A system of record for one credential.
pub trait Source {
    /// Produce a fresh credential set.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(set))` when a value is ready to publish
    /// - `Ok(None)` when the credential is not due for rotation
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the backing system failed or rejected the
    /// rotation. No partial credential is ever returned.
    fn read(&self, ctx: &Context) -> Result<Option<CredentialSet>, SourceError>;

    fn kind(&self) -> SourceKind;
}
