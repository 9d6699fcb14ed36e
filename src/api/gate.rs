//! In-flight gating for dashboard controls.

use super::{ApiError, ApiResult};
use std::sync::atomic::{AtomicBool, Ordering};

/// Allows at most one in-flight request per control.
#[derive(Debug, Default)]
pub struct ActionGate {
    busy: AtomicBool,
}

impl ActionGate {
    /// Creates an idle gate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// Marks the control busy until the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Busy`] when the control already has a request in
    /// flight.
    pub fn try_acquire(&self, action: &'static str) -> ApiResult<GateGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| GateGuard { gate: self })
            .map_err(|_| ApiError::Busy(action))
    }

    /// Returns whether a request is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases its [`ActionGate`] on drop.
#[derive(Debug)]
#[must_use = "the control is released as soon as the guard is dropped"]
pub struct GateGuard<'a> {
    gate: &'a ActionGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}
