//! AWS IAM integration tests.
//!
//! These tests rotate the keys of a real, disposable IAM user. Set:
//! - `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` (or use the credential chain)
//! - `ROTATOR_TEST_IAM_USER` (a user whose keys may be deleted)
//!
//! ```bash
//! cargo test --features aws,test-aws aws_iam
//! ```
//!
//! Without credentials, tests skip gracefully.

#![cfg(all(feature = "aws", feature = "test-aws"))]

mod support;

use std::time::Duration;

use chrono::Utc;

use rotator::core::aws::AwsTarget;
use rotator::core::source::aws_iam::AwsIam;
use rotator::core::source::{AccessKeyApi, IamKeySource};

fn user() -> String {
    std::env::var("ROTATOR_TEST_IAM_USER").expect("ROTATOR_TEST_IAM_USER must be set")
}

#[test]
fn test_rotation_stays_within_two_keys() {
    skip_without_aws!();

    let api = AwsIam::connect(&AwsTarget::default()).expect("failed to build iam client");
    let before = api.list_access_keys(&user()).expect("list failed").len();

    let source = IamKeySource::new(user(), Box::new(api)).with_max_age(Duration::ZERO);
    let key = source.rotate_keys(Utc::now()).expect("rotation failed");

    if before < 2 {
        assert!(key.is_some(), "a user with {} keys must get a new one", before);
    }

    let api = AwsIam::connect(&AwsTarget::default()).expect("failed to build iam client");
    let after = api.list_access_keys(&user()).expect("list failed");
    assert!(after.len() <= 2);
}
