//! Cooperative cancellation for scans.
//!
//! A scan checks its token between chunk reads and between pipeline steps,
//! never inside a single detector's in-memory pass. Collaborator processes
//! poll the same token while they run so a cancelled scan kills them.

use crate::error::{Result, ScanError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Shared cancellation flag with an optional deadline.
///
/// Clones share the same flag, so a caller can keep one handle and pass
/// another into the scanner.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<(Instant, Duration)>,
}

impl CancelToken {
    /// Create a token that only trips when `cancel` is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a token that also trips once `limit` has elapsed.
    pub fn with_timeout(limit: Duration) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Some((Instant::now() + limit, limit)),
        }
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// True when cancelled or past the deadline.
    pub fn is_cancelled(&self) -> bool {
        self.check().is_err()
    }

    /// Return the cancellation error if the scan must stop.
    pub fn check(&self) -> Result<()> {
        if self.flag.load(Ordering::SeqCst) {
            debug!("cancellation requested");
            return Err(ScanError::Cancelled);
        }
        if let Some((deadline, limit)) = self.deadline {
            if Instant::now() >= deadline {
                debug!("scan deadline of {:?} elapsed", limit);
                return Err(ScanError::Timeout {
                    seconds: limit.as_secs(),
                });
            }
        }
        Ok(())
    }
}
