//! Core library components.
//!
//! The rotation engine (sources, sinks, retry, orchestrator) plus the
//! configuration layer that builds jobs from a `rotator.toml`.

#[cfg(feature = "aws")]
pub mod aws;
pub mod config;
pub mod constants;
pub mod context;
pub mod credentials;
pub mod job;
pub mod retry;
pub mod rotator;
pub mod runtime;
pub mod sink;
pub mod source;

pub use context::Context;
pub use credentials::{CredentialSet, KeyToName};
pub use job::RotationJob;
pub use rotator::rotate_secrets;
