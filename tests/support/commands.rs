//! Command helper methods for Test.

use std::process::Output;

use assert_cmd::Command;

use super::Test;

impl Test {
    /// Create a rotator command running inside the test directory.
    ///
    /// Provider tokens and `ROTATOR_*` variables from the outer environment
    /// are cleared so tests see only what they set.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("rotator").expect("failed to find rotator binary");
        for var in [
            "ROTATOR_CONFIG",
            "ROTATOR_LOG",
            "CIRCLECI_AUTH_TOKEN",
            "TRAVIS_API_AUTH_TOKEN",
            "GITHUB_ACTIONS_AUTH_TOKEN",
            "HEROKU_BEARER_TOKEN",
        ] {
            cmd.env_remove(var);
        }
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `rotator plan`.
    pub fn plan(&self) -> Output {
        self.cmd()
            .arg("plan")
            .output()
            .expect("failed to run rotator plan")
    }

    /// Shortcut for `rotator rotate --yes`.
    pub fn rotate_yes(&self) -> Output {
        self.cmd()
            .args(["rotate", "--yes"])
            .output()
            .expect("failed to run rotator rotate --yes")
    }

    /// Run `rotator rotate` answering the prompt with `answer`.
    pub fn rotate_answering(&self, answer: &str) -> Output {
        self.cmd()
            .arg("rotate")
            .write_stdin(format!("{}\n", answer))
            .output()
            .expect("failed to run rotator rotate")
    }
}
