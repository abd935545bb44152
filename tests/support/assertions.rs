//! Checks over captured `rotator` output.
//!
//! Every failure message carries both streams and the exit status, since a
//! rotation run reports failures on stderr and the plan on stdout.

use std::process::Output;

use predicates::prelude::*;
use predicates::str::contains;

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn transcript(output: &Output) -> String {
    format!(
        "{}\n--- stdout\n{}--- stderr\n{}",
        output.status,
        stdout(output),
        stderr(output)
    )
}

pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "rotator exited non-zero\n{}",
        transcript(output)
    );
}

/// Handled errors exit with 1; anything else (a panic, a clap usage error)
/// is a different failure.
pub fn assert_failure(output: &Output) {
    assert_eq!(
        output.status.code(),
        Some(1),
        "expected exit code 1\n{}",
        transcript(output)
    );
}

pub fn assert_stdout_contains(output: &Output, expected: &str) {
    assert!(
        contains(expected).eval(&stdout(output)),
        "stdout missing {:?}\n{}",
        expected,
        transcript(output)
    );
}

pub fn assert_stderr_contains(output: &Output, expected: &str) {
    assert!(
        contains(expected).eval(&stderr(output)),
        "stderr missing {:?}\n{}",
        expected,
        transcript(output)
    );
}

pub fn assert_stdout_excludes(output: &Output, excluded: &str) {
    assert!(
        contains(excluded).not().eval(&stdout(output)),
        "stdout unexpectedly has {:?}\n{}",
        excluded,
        transcript(output)
    );
}
