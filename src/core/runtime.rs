//! Blocking bridge for async provider clients.
//!
//! The engine is synchronous. Provider SDKs (AWS, reqwest) are async, so each
//! client wrapper owns a current-thread tokio runtime and blocks on it for
//! the duration of a single call.

use std::future::Future;

use tokio::runtime::{Builder, Runtime};

/// A private current-thread runtime.
#[derive(Debug)]
pub struct Blocking {
    rt: Runtime,
}

impl Blocking {
    pub fn new() -> std::io::Result<Self> {
        let rt = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { rt })
    }

    /// Drive `fut` to completion on this runtime.
    pub fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.rt.block_on(fut)
    }
}
