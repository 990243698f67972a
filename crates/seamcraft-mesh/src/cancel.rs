//! Cooperative cancellation for long-running iterative stages.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Signal polled by iterative loops at each iteration boundary.
///
/// Implementations must be cheap to query; the clustering and conformal
/// solver loops check it once per iteration.
pub trait CancelSignal: Sync {
    /// Has the caller asked the operation to stop?
    fn is_cancelled(&self) -> bool;
}

/// A signal that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelSignal for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl CancelSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<T: CancelSignal + Send + ?Sized> CancelSignal for Arc<T> {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl<T: CancelSignal + ?Sized> CancelSignal for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_cancel() {
        assert!(!NeverCancel.is_cancelled());
    }

    #[test]
    fn test_atomic_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let signal: &dyn CancelSignal = &flag;
        assert!(!signal.is_cancelled());
        flag.store(true, Ordering::Relaxed);
        assert!(signal.is_cancelled());
    }
}
