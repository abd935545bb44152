//! Config fixtures.

/// One dummy secret printed by the stdout sink.
pub const DUMMY_TO_STDOUT: &str = r#"
version = 1

[[secrets]]
name = "api-token"
source = { kind = "dummy" }

[[secrets.sinks]]
kind = "stdout"
key_to_name = { secret = "API_TOKEN" }
"#;

/// An env secret whose variable the tests never set, followed by a dummy
/// secret that must still be rotated.
pub const UNSET_ENV_THEN_DUMMY: &str = r#"
[[secrets]]
name = "upstream"
source = { kind = "env", name = "ROTATOR_TEST_NEVER_SET" }

[[secrets.sinks]]
kind = "stdout"
key_to_name = { ROTATOR_TEST_NEVER_SET = "UPSTREAM" }

[[secrets]]
name = "api-token"
source = { kind = "dummy" }

[[secrets.sinks]]
kind = "stdout"
key_to_name = { secret = "API_TOKEN" }
"#;

/// A dummy secret with a sink mapping that does not cover its key.
pub const UNMAPPED_KEY: &str = r#"
[[secrets]]
name = "api-token"
source = { kind = "dummy" }

[[secrets.sinks]]
kind = "stdout"
key_to_name = { other = "OTHER" }
"#;

/// Dummy secret into a Heroku app, which needs `HEROKU_BEARER_TOKEN`.
pub const DUMMY_TO_HEROKU: &str = r#"
[[secrets]]
name = "api-token"
source = { kind = "dummy" }

[[secrets.sinks]]
kind = "heroku"
app = "acme-api"
key_to_name = { secret = "API_TOKEN" }
"#;
