//! Cooperative interruption of long computations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Tells workers whether they should stop.
///
/// Workers poll the monitor between units of work, never in the middle of a
/// rule application, so stopping never loses derived conclusions.
pub trait InterruptMonitor: Sync {
    fn is_interrupted(&self) -> bool;
}

/// A monitor that is never interrupted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverInterrupted;

impl InterruptMonitor for NeverInterrupted {
    #[inline]
    fn is_interrupted(&self) -> bool {
        false
    }
}

/// Interruption flag with an optional deadline.
///
/// Once interrupted, either explicitly or because the deadline passed, it stays
/// interrupted until [`clear_interrupt`](Self::clear_interrupt) is called.
#[derive(Debug, Default)]
pub struct Interrupter {
    interrupted: AtomicBool,
    deadline: Mutex<Option<Instant>>,
    timed_out: AtomicBool,
}

impl Interrupter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests all workers polling this monitor to stop.
    pub fn interrupt(&self) {
        self.interrupted.store(true, Ordering::Release);
    }

    /// Resets the flag and removes the deadline.
    pub fn clear_interrupt(&self) {
        *self.deadline.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.timed_out.store(false, Ordering::Release);
        self.interrupted.store(false, Ordering::Release);
    }

    /// Interrupts automatically once `timeout` elapsed from now.
    pub fn set_timeout(&self, timeout: Option<Duration>) {
        *self.deadline.lock().unwrap_or_else(PoisonError::into_inner) =
            timeout.and_then(|t| Instant::now().checked_add(t));
    }

    /// Whether the interruption was caused by the deadline.
    pub fn is_timed_out(&self) -> bool {
        self.timed_out.load(Ordering::Acquire)
    }
}

impl InterruptMonitor for Interrupter {
    fn is_interrupted(&self) -> bool {
        if self.interrupted.load(Ordering::Acquire) {
            return true;
        }
        let deadline = *self.deadline.lock().unwrap_or_else(PoisonError::into_inner);
        if deadline.is_some_and(|d| Instant::now() >= d) {
            self.timed_out.store(true, Ordering::Release);
            self.interrupted.store(true, Ordering::Release);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interruption_is_sticky() {
        let interrupter = Interrupter::new();
        assert!(!interrupter.is_interrupted());
        interrupter.interrupt();
        assert!(interrupter.is_interrupted());
        assert!(interrupter.is_interrupted());
        assert!(!interrupter.is_timed_out());
        interrupter.clear_interrupt();
        assert!(!interrupter.is_interrupted());
    }

    #[test]
    fn deadline_interrupts() {
        let interrupter = Interrupter::new();
        interrupter.set_timeout(Some(Duration::ZERO));
        assert!(interrupter.is_interrupted());
        assert!(interrupter.is_timed_out());
        interrupter.clear_interrupt();
        assert!(!interrupter.is_interrupted());
        interrupter.set_timeout(Some(Duration::from_secs(3600)));
        assert!(!interrupter.is_interrupted());
    }
}
