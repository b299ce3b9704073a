//! Cancellation and time limits for an export in progress.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Shared flag that asks a running export to stop
///
/// Clones share the same flag, so one can be handed to another thread (or a
/// signal handler) while the export runs.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; observed before the next capture starts
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Per-invocation export controls
#[derive(Debug, Clone, Default)]
pub struct ExportControl {
    cancel: CancelToken,
    capture_timeout: Option<Duration>,
}

impl ExportControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing cancel token
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Fail any single capture that takes longer than `timeout`
    pub fn with_capture_timeout(mut self, timeout: Duration) -> Self {
        self.capture_timeout = Some(timeout);
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn capture_timeout(&self) -> Option<Duration> {
        self.capture_timeout
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_shared_between_clones() {
        let token = CancelToken::new();
        let control = ExportControl::new().with_cancel_token(token.clone());

        assert!(!control.is_cancelled());
        token.cancel();
        assert!(control.is_cancelled());
    }

    #[test]
    fn test_timeout() {
        let control = ExportControl::new();
        assert_eq!(control.capture_timeout(), None);

        let control = control.with_capture_timeout(Duration::from_secs(5));
        assert_eq!(control.capture_timeout(), Some(Duration::from_secs(5)));
    }
}
