//! Run context passed to every source read and sink write.
//!
//! Carries a cancellation token and an optional deadline. The engine checks
//! it before issuing a remote call; calls already in flight are left to the
//! transport.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    ///
    /// A timeout too large to represent as an instant means no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Handle that can cancel this context from elsewhere.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once cancelled or past the deadline.
    pub fn is_done(&self) -> bool {
        self.token.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Time left before the deadline, if one was set.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context_is_live() {
        let ctx = Context::new();
        assert!(!ctx.is_done());
        assert!(ctx.remaining().is_none());
    }

    #[test]
    fn test_cancel_via_token() {
        let ctx = Context::new();
        ctx.token().cancel();
        assert!(ctx.is_done());
    }

    #[test]
    fn test_expired_deadline() {
        let ctx = Context::with_timeout(Duration::ZERO);
        assert!(ctx.is_done());
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_unrepresentable_timeout_has_no_deadline() {
        let ctx = Context::with_timeout(Duration::from_secs(u64::MAX));
        assert!(!ctx.is_done());
        assert!(ctx.remaining().is_none());
    }
}
