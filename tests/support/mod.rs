//! Test support utilities for rotator integration tests.
//!
//! Provides an isolated working directory per test and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with an isolated temp directory.
///
/// Child processes run with `.current_dir()` set to it, so tests can run in
/// parallel without touching process-global state.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Create a test environment with `rotator.toml` written.
    pub fn with_config(contents: &str) -> Self {
        let t = Self::new();
        t.write_config(contents);
        t
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("rotator.toml")
    }

    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.config_path(), contents).expect("failed to write config");
    }
}
