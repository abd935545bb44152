//! AWS Secrets Manager sink.
//!
//! Stores a new version of an existing secret. The secret must already
//! exist; provider calls need the `aws` feature.

use tracing::info;

use super::{Sink, SinkKind};
use crate::core::{Context, KeyToName};
use crate::error::SinkError;

#[cfg(feature = "aws")]
pub use sdk::AwsSecretsManager;

/// Secrets Manager calls used by the sink.
pub trait SecretValueApi {
    /// Store `value` as the current version of secret `name`.
    ///
    /// Fails with `SinkError::NotFound` if the secret does not exist.
    fn put_secret_value(&self, name: &str, value: &str) -> Result<(), SinkError>;
}

pub struct AwsSecretsManagerSink {
    key_to_name: KeyToName,
    api: Box<dyn SecretValueApi>,
}

impl AwsSecretsManagerSink {
    pub fn new(key_to_name: KeyToName, api: Box<dyn SecretValueApi>) -> Self {
        Self { key_to_name, api }
    }
}

impl Sink for AwsSecretsManagerSink {
    fn write(&self, _ctx: &Context, name: &str, value: &str) -> Result<(), SinkError> {
        self.api.put_secret_value(name, value)?;
        info!(secret = %name, "stored new secret value");
        Ok(())
    }

    fn key_to_name(&self) -> &KeyToName {
        &self.key_to_name
    }

    fn kind(&self) -> SinkKind {
        SinkKind::AwsSecretsManager
    }
}

#[cfg(feature = "aws")]
mod sdk {
    use aws_sdk_secretsmanager::error::DisplayErrorContext;

    use super::SecretValueApi;
    use crate::core::aws::{load_config, AwsTarget};
    use crate::core::runtime::Blocking;
    use crate::error::SinkError;

    /// Secrets Manager client driven on a private runtime.
    pub struct AwsSecretsManager {
        rt: Blocking,
        client: aws_sdk_secretsmanager::Client,
    }

    impl AwsSecretsManager {
        pub fn connect(target: &AwsTarget) -> std::io::Result<Self> {
            let rt = Blocking::new()?;
            let config = load_config(&rt, target);
            let client = aws_sdk_secretsmanager::Client::new(&config);
            Ok(Self { rt, client })
        }
    }

    impl SecretValueApi for AwsSecretsManager {
        fn put_secret_value(&self, name: &str, value: &str) -> Result<(), SinkError> {
            let result = self.rt.block_on(
                self.client
                    .put_secret_value()
                    .secret_id(name)
                    .secret_string(value)
                    .send(),
            );

            match result {
                Ok(_) => Ok(()),
                Err(e)
                    if e.as_service_error()
                        .is_some_and(|se| se.is_resource_not_found_exception()) =>
                {
                    Err(SinkError::NotFound(format!("secret {}", name)))
                }
                Err(e) => Err(SinkError::Provider {
                    context: format!(
                        "unable to store a new secret value for {} in aws secrets manager",
                        name
                    ),
                    message: DisplayErrorContext(e).to_string(),
                }),
            }
        }
    }
}
