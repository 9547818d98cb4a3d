// SQRL Store - Operation context
//
// Carries the caller's cancellation token and deadline into every store
// operation. `OpContext::background()` never cancels and never expires.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use super::StorageError;

#[derive(Debug, Clone, Default)]
pub struct OpContext {
    token: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl OpContext {
    /// Unbounded, non-cancellable context.
    pub fn background() -> Self {
        Self::default()
    }

    /// Cancel operations when `token` is cancelled.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    /// Fail operations that are still running at `deadline`. An earlier
    /// deadline already on the context is kept.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) if existing < deadline => existing,
            _ => deadline,
        });
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.is_expired()
    }

    /// `Ok` while the operation may proceed.
    pub fn check(&self) -> Result<(), StorageError> {
        if self.is_cancelled() {
            return Err(StorageError::Cancelled);
        }
        if self.is_expired() {
            return Err(StorageError::DeadlineExceeded);
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
