//! AWS SSM Parameter Store sink.
//!
//! The parameter must already exist: its current type (`String`,
//! `SecureString`, ...) is read and reused on overwrite. Provider calls need
//! the `aws` feature.

use tracing::info;

use super::{Sink, SinkKind};
use crate::core::{Context, KeyToName};
use crate::error::SinkError;

#[cfg(feature = "aws")]
pub use sdk::AwsSsm;

/// Parameter store calls used by the sink.
pub trait ParameterApi {
    /// Type of the named parameter, or `None` if it does not exist.
    fn parameter_type(&self, name: &str) -> Result<Option<String>, SinkError>;

    /// Overwrite the parameter's value, keeping `parameter_type`.
    fn put_parameter(&self, name: &str, value: &str, parameter_type: &str)
        -> Result<(), SinkError>;
}

pub struct AwsParamSink {
    key_to_name: KeyToName,
    api: Box<dyn ParameterApi>,
}

impl AwsParamSink {
    pub fn new(key_to_name: KeyToName, api: Box<dyn ParameterApi>) -> Self {
        Self { key_to_name, api }
    }
}

impl Sink for AwsParamSink {
    fn write(&self, _ctx: &Context, name: &str, value: &str) -> Result<(), SinkError> {
        let parameter_type = self
            .api
            .parameter_type(name)?
            .ok_or_else(|| SinkError::NotFound(format!("parameter {}", name)))?;

        self.api.put_parameter(name, value, &parameter_type)?;
        info!(parameter = %name, "wrote ssm parameter");
        Ok(())
    }

    fn key_to_name(&self) -> &KeyToName {
        &self.key_to_name
    }

    fn kind(&self) -> SinkKind {
        SinkKind::AwsParamStore
    }
}

#[cfg(feature = "aws")]
mod sdk {
    use aws_sdk_ssm::error::DisplayErrorContext;
    use aws_sdk_ssm::types::ParameterType;

    use super::ParameterApi;
    use crate::core::aws::{load_config, AwsTarget};
    use crate::core::runtime::Blocking;
    use crate::error::SinkError;

    /// SSM client driven on a private runtime.
    pub struct AwsSsm {
        rt: Blocking,
        client: aws_sdk_ssm::Client,
    }

    impl AwsSsm {
        pub fn connect(target: &AwsTarget) -> std::io::Result<Self> {
            let rt = Blocking::new()?;
            let config = load_config(&rt, target);
            let client = aws_sdk_ssm::Client::new(&config);
            Ok(Self { rt, client })
        }
    }

    impl ParameterApi for AwsSsm {
        fn parameter_type(&self, name: &str) -> Result<Option<String>, SinkError> {
            let result = self
                .rt
                .block_on(self.client.get_parameter().name(name).send());

            match result {
                Ok(out) => Ok(out
                    .parameter()
                    .and_then(|p| p.r#type())
                    .map(|t| t.as_str().to_string())),
                Err(e)
                    if e.as_service_error()
                        .is_some_and(|se| se.is_parameter_not_found()) =>
                {
                    Ok(None)
                }
                Err(e) => Err(SinkError::Provider {
                    context: format!("unable to get parameter {} from aws parameter store", name),
                    message: DisplayErrorContext(e).to_string(),
                }),
            }
        }

        fn put_parameter(
            &self,
            name: &str,
            value: &str,
            parameter_type: &str,
        ) -> Result<(), SinkError> {
            self.rt
                .block_on(
                    self.client
                        .put_parameter()
                        .name(name)
                        .value(value)
                        .r#type(ParameterType::from(parameter_type))
                        .overwrite(true)
                        .send(),
                )
                .map_err(|e| SinkError::Provider {
                    context: format!("unable to edit parameter {} in aws parameter store", name),
                    message: DisplayErrorContext(e).to_string(),
                })?;
            Ok(())
        }
    }
}
