//! Retry wrapper for flaky remote writes.
//!
//! Fixed attempt budget, fixed base sleep plus uniform jitter in
//! `[0, base)` between attempts. Every error is retried; the last one is
//! returned once the budget is spent. No backoff growth, no error
//! classification.

use std::fmt::Display;
use std::thread;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::core::constants::{DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_SLEEP};
use crate::core::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retry {
    attempts: u32,
    sleep: Duration,
}

impl Default for Retry {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_SLEEP)
    }
}

impl Retry {
    /// `attempts` below 1 is treated as 1.
    pub fn new(attempts: u32, sleep: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            sleep,
        }
    }

    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Run `op` until it succeeds or the budget is spent.
    ///
    /// Stops early, returning the last error, once `ctx` is done.
    pub fn run<T, E, F>(&self, ctx: &Context, mut op: F) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Result<T, E>,
    {
        let mut attempt = 1;
        loop {
            let err = match op() {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if attempt >= self.attempts || ctx.is_done() {
                return Err(err);
            }

            let delay = self.delay();
            warn!(
                attempt,
                max_attempts = self.attempts,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "remote write failed, retrying"
            );
            thread::sleep(delay);
            if ctx.is_done() {
                return Err(err);
            }
            attempt += 1;
        }
    }

    fn delay(&self) -> Duration {
        if self.sleep.is_zero() {
            return Duration::ZERO;
        }
        let jitter = rand::thread_rng().gen_range(Duration::ZERO..self.sleep);
        self.sleep + jitter
    }
}
