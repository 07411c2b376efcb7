//! Cooperative cancellation for parse calls.
//!
//! A `Context` is a cheap, cloneable handle carrying an optional cancel
//! flag and an optional deadline. The parser checks it at statement
//! boundaries and in every bounded loop; in-flight token reads are never
//! interrupted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Why a context stopped being live. The `Display` text is carried
/// verbatim into the "context error" diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("context canceled")]
    Canceled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation handle passed into [`crate::parser::parse`].
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: Option<Arc<AtomicBool>>,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    /// A cancellable context and the handle that cancels it.
    pub fn with_cancel() -> (Self, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        let ctx = Self {
            cancel: Some(Arc::clone(&flag)),
            deadline: None,
        };
        (ctx, CancelHandle(flag))
    }

    /// A context that expires at `deadline`.
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancel: None,
            deadline: Some(deadline),
        }
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// `Some` once the context has been cancelled or its deadline passed.
    pub fn err(&self) -> Option<ContextError> {
        if let Some(flag) = &self.cancel
            && flag.load(Ordering::Relaxed)
        {
            return Some(ContextError::Canceled);
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            return Some(ContextError::DeadlineExceeded);
        }
        None
    }
}

/// Cancels the paired [`Context`]. Cloneable; cancelling is idempotent.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
}
