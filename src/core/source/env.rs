//! Environment-variable source.

use tracing::debug;

use super::{Source, SourceKind};
use crate::core::{Context, CredentialSet};
use crate::error::SourceError;

/// Reads one environment variable; the credential key is the variable name.
#[derive(Debug, Clone)]
pub struct Env {
    name: String,
}

impl Env {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Source for Env {
    fn read(&self, _ctx: &Context) -> Result<Option<CredentialSet>, SourceError> {
        debug!(name = %self.name, "reading environment variable");
        let value =
            std::env::var(&self.name).map_err(|_| SourceError::MissingEnv(self.name.clone()))?;

        let mut set = CredentialSet::new();
        set.insert(self.name.clone(), value);
        Ok(Some(set))
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_reads_present_variable() {
        std::env::set_var("ROTATOR_TEST_ENV_PRESENT", "s3cret");
        let set = Env::new("ROTATOR_TEST_ENV_PRESENT")
            .read(&Context::new())
            .unwrap()
            .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("ROTATOR_TEST_ENV_PRESENT"), Some("s3cret"));
    }

    #[test]
    fn test_env_missing_variable_is_error() {
        let err = Env::new("ROTATOR_TEST_ENV_NEVER_SET")
            .read(&Context::new())
            .unwrap_err();
        assert!(matches!(err, SourceError::MissingEnv(name) if name == "ROTATOR_TEST_ENV_NEVER_SET"));
    }
}
