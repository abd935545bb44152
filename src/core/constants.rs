//! Constants used throughout rotator.
//!
//! Centralizes magic strings and configuration values.

use std::time::Duration;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "rotator.toml";

/// The only config file format this build understands.
pub const CONFIG_VERSION: u32 = 1;

/// Credential key for an IAM access key id.
pub const AWS_ACCESS_KEY_ID: &str = "accessKeyId";

/// Credential key for an IAM secret access key.
pub const AWS_SECRET_ACCESS_KEY: &str = "secretAccessKey";

/// Credential key produced by the dummy source.
pub const DUMMY_SECRET: &str = "secret";

/// Grace window applied to IAM keys when `max_age` is not configured.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

/// Providers allow at most this many access keys per IAM user.
pub const MAX_ACCESS_KEYS: usize = 2;

/// Attempts made by the retry wrapper before giving up.
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 5;

/// Base sleep between retry attempts; jitter in `[0, base)` is added.
pub const DEFAULT_RETRY_SLEEP: Duration = Duration::from_secs(1);

/// Environment variables holding provider tokens.
pub const ENV_CIRCLECI_TOKEN: &str = "CIRCLECI_AUTH_TOKEN";
pub const ENV_TRAVIS_TOKEN: &str = "TRAVIS_API_AUTH_TOKEN";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_ACTIONS_AUTH_TOKEN";
pub const ENV_HEROKU_TOKEN: &str = "HEROKU_BEARER_TOKEN";

/// Provider API base URLs.
pub const CIRCLECI_BASE_URL: &str = "https://circleci.com";
pub const TRAVIS_BASE_URL: &str = "https://api.travis-ci.com";
pub const GITHUB_BASE_URL: &str = "https://api.github.com";
pub const HEROKU_BASE_URL: &str = "https://api.heroku.com";

/// User agent sent with every HTTP request.
pub const USER_AGENT: &str = concat!("rotator/", env!("CARGO_PKG_VERSION"));
