//! Shutdown signal - the only way out of the scheduler loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Answers whether shutdown has been requested
///
/// Polled once per loop iteration.
pub trait ShutdownSignal {
    fn is_requested(&self) -> bool;
}

impl ShutdownSignal for AtomicBool {
    fn is_requested(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

impl ShutdownSignal for Arc<AtomicBool> {
    fn is_requested(&self) -> bool {
        self.load(Ordering::SeqCst)
    }
}

/// Shutdown decided by a predicate
pub struct ShutdownWhen<F>(F);

/// Wrap a predicate as a shutdown signal
pub fn shutdown_when<F: Fn() -> bool>(predicate: F) -> ShutdownWhen<F> {
    ShutdownWhen(predicate)
}

impl<F: Fn() -> bool> ShutdownSignal for ShutdownWhen<F> {
    fn is_requested(&self) -> bool {
        (self.0)()
    }
}
