//! Shared AWS SDK configuration.
//!
//! Enable with `--features aws`. Credentials come from the default provider
//! chain (environment, shared credentials file, instance profile). When a
//! `role_arn` is configured the chain is used to assume that role first,
//! passing `external_id` along if set.

use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::debug;

use crate::core::runtime::Blocking;

const SESSION_NAME: &str = "rotator";

/// Where and as whom to talk to AWS.
#[derive(Debug, Clone, Default)]
pub struct AwsTarget {
    pub role_arn: Option<String>,
    pub external_id: Option<String>,
    pub region: Option<String>,
}

/// Load an SDK config for `target`, blocking on `rt`.
pub fn load_config(rt: &Blocking, target: &AwsTarget) -> SdkConfig {
    rt.block_on(async {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &target.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let base = loader.load().await;

        let Some(role_arn) = &target.role_arn else {
            return base;
        };

        debug!(role_arn = %role_arn, "assuming role");
        let mut provider = AssumeRoleProvider::builder(role_arn.clone())
            .session_name(SESSION_NAME)
            .configure(&base);
        if let Some(external_id) = &target.external_id {
            provider = provider.external_id(external_id.clone());
        }
        let provider = provider.build().await;

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(provider);
        if let Some(region) = &target.region {
            loader = loader.region(Region::new(region.clone()));
        }
        loader.load().await
    })
}
